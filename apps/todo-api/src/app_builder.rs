//! # Todo API アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `startup` はインフラ初期化とサーバー起動に集中する。
//!
//! ## ルート構成
//!
//! ```text
//! /                       公開
//! /health, /health/ready  公開
//! /api/auth/register      公開
//! /api/auth/login         公開
//! /api/auth/me            要 Bearer トークン
//! /api/tasks/**           要 Bearer トークン
//! ```

use std::sync::Arc;

use axum::{
   Router,
   http::HeaderValue,
   middleware::from_fn_with_state,
   routing::{get, patch, post},
};
use chrono::Duration;
use todo_domain::clock::{Clock, SystemClock};
use todo_infra::{
   Argon2PasswordHasher,
   InfraError,
   JwtTokenService,
   PasswordHasher,
   TokenService,
   db::{Engine, PgSessionFactory, SessionFactory},
   repository::{PostgresTaskRepository, PostgresUserRepository, TaskRepository, UserRepository},
};
use todo_shared::observability::make_request_span;
use tower_http::{
   cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
   trace::TraceLayer,
};

use crate::{
   handler::{
      AuthState,
      ReadinessProbe,
      ReadinessState,
      TaskState,
      create_task,
      delete_task,
      get_task,
      health_check,
      list_tasks,
      login,
      me,
      readiness_check,
      register,
      root,
      toggle_task,
      update_task,
   },
   middleware::{AuthLayerState, require_auth},
   usecase::{AuthUseCase, AuthUseCaseImpl, TaskUseCase, TaskUseCaseImpl},
};

/// ブラウザからのアクセスを許可するオリジン
pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

/// ルーター構築に必要な依存コンポーネント
pub struct AppDependencies {
   pub auth_usecase:  Arc<dyn AuthUseCase>,
   pub task_usecase:  Arc<dyn TaskUseCase>,
   pub token_service: Arc<dyn TokenService>,
   pub readiness:     Arc<dyn ReadinessProbe>,
}

impl AppDependencies {
   /// PostgreSQL 実装で依存コンポーネントを組み立てる
   pub fn postgres(
      engine: Arc<Engine>,
      jwt_secret: &str,
      token_ttl_minutes: i64,
   ) -> Result<Self, InfraError> {
      let sessions: Arc<dyn SessionFactory> =
         Arc::new(PgSessionFactory::new(engine.pool().clone()));
      let user_repository: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new());
      let task_repository: Arc<dyn TaskRepository> = Arc::new(PostgresTaskRepository::new());
      let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new()?);
      let token_ttl = Duration::try_minutes(token_ttl_minutes)
         .ok_or_else(|| InfraError::unexpected("トークンの有効期間が大きすぎます"))?;
      let token_service: Arc<dyn TokenService> =
         Arc::new(JwtTokenService::new(jwt_secret, token_ttl));
      let clock: Arc<dyn Clock> = Arc::new(SystemClock);

      Ok(Self::assemble(
         sessions,
         user_repository,
         task_repository,
         password_hasher,
         token_service,
         clock,
         engine,
      ))
   }

   /// 個別の実装から依存コンポーネントを組み立てる
   pub fn assemble(
      sessions: Arc<dyn SessionFactory>,
      user_repository: Arc<dyn UserRepository>,
      task_repository: Arc<dyn TaskRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      token_service: Arc<dyn TokenService>,
      clock: Arc<dyn Clock>,
      readiness: Arc<dyn ReadinessProbe>,
   ) -> Self {
      let auth_usecase = AuthUseCaseImpl::new(
         sessions.clone(),
         user_repository,
         password_hasher,
         token_service.clone(),
         clock.clone(),
      );
      let task_usecase = TaskUseCaseImpl::new(sessions, task_repository, clock);

      Self {
         auth_usecase: Arc::new(auth_usecase),
         task_usecase: Arc::new(task_usecase),
         token_service,
         readiness,
      }
   }
}

/// CORS レイヤー
///
/// 許可オリジンは [`ALLOWED_ORIGINS`] のみ。メソッドとヘッダは
/// プリフライトの要求をそのまま許可し、Cookie 等の資格情報を許可する。
pub fn cors_layer() -> CorsLayer {
   CorsLayer::new()
      .allow_origin(AllowOrigin::list(
         ALLOWED_ORIGINS.map(HeaderValue::from_static),
      ))
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .allow_credentials(true)
}

/// ルーターを構築する
pub fn build_app(deps: AppDependencies) -> Router {
   let auth_layer = from_fn_with_state(
      AuthLayerState {
         token_service: deps.token_service,
      },
      require_auth,
   );

   let auth_state = Arc::new(AuthState {
      usecase: deps.auth_usecase,
   });
   let task_state = Arc::new(TaskState {
      usecase: deps.task_usecase,
   });
   let readiness_state = Arc::new(ReadinessState {
      database: deps.readiness,
   });

   let auth_routes = Router::new()
      .route("/me", get(me))
      .route_layer(auth_layer.clone())
      .route("/register", post(register))
      .route("/login", post(login))
      .with_state(auth_state);

   let task_routes = Router::new()
      .route("/", get(list_tasks).post(create_task))
      .route(
         "/{id}",
         get(get_task).put(update_task).delete(delete_task),
      )
      .route("/{id}/complete", patch(toggle_task))
      .route_layer(auth_layer)
      .with_state(task_state);

   let api = Router::new()
      .nest("/auth", auth_routes)
      .nest("/tasks", task_routes);

   // レイヤーは下に書いたものが外側。CORS を最外にしてプリフライトを認証より先に返す
   Router::new()
      .route("/", get(root))
      .route("/health", get(health_check))
      .merge(
         Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(readiness_state),
      )
      .nest("/api", api)
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(cors_layer())
}
