//! # 認証ユースケース
//!
//! ユーザー登録・ログイン・トークン検証を実装する。
//!
//! ## タイミング攻撃対策
//!
//! ログインでは、ユーザーが存在しない場合もダミーハッシュで
//! 検証を実行し、処理時間を均一化する。

use std::sync::Arc;

use async_trait::async_trait;
use todo_domain::{
   DomainError,
   clock::Clock,
   password::PlainPassword,
   token::{IssuedToken, TokenSubject},
   user::{Email, User, UserId, UserName},
};
use todo_infra::{
   PasswordHasher,
   TokenService,
   db::SessionFactory,
   repository::UserRepository,
};

use crate::error::ApiError;

/// ユーザー登録の入力
#[derive(Debug)]
pub struct RegisterInput {
   pub email:    String,
   pub password: String,
   pub name:     String,
}

/// ログインの入力
#[derive(Debug)]
pub struct LoginInput {
   pub email:    String,
   pub password: String,
}

/// 登録・ログイン成功時の出力
#[derive(Debug, Clone)]
pub struct AuthOutput {
   pub user:  User,
   pub token: IssuedToken,
}

/// 認証ユースケース
#[async_trait]
pub trait AuthUseCase: Send + Sync {
   /// ユーザーを登録し、トークンを発行する
   async fn register(&self, input: RegisterInput) -> Result<AuthOutput, ApiError>;

   /// 認証情報を照合し、トークンを発行する
   async fn login(&self, input: LoginInput) -> Result<AuthOutput, ApiError>;

   /// ID でユーザーを取得する
   async fn current_user(&self, user_id: &UserId) -> Result<User, ApiError>;
}

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
   sessions:         Arc<dyn SessionFactory>,
   user_repository:  Arc<dyn UserRepository>,
   password_hasher:  Arc<dyn PasswordHasher>,
   token_service:    Arc<dyn TokenService>,
   clock:            Arc<dyn Clock>,
}

impl AuthUseCaseImpl {
   pub fn new(
      sessions: Arc<dyn SessionFactory>,
      user_repository: Arc<dyn UserRepository>,
      password_hasher: Arc<dyn PasswordHasher>,
      token_service: Arc<dyn TokenService>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         sessions,
         user_repository,
         password_hasher,
         token_service,
         clock,
      }
   }

   fn issue(&self, user: User) -> Result<AuthOutput, ApiError> {
      let token = self
         .token_service
         .issue(user.id(), user.email(), self.clock.now())?;
      Ok(AuthOutput { user, token })
   }
}

#[async_trait]
impl AuthUseCase for AuthUseCaseImpl {
   #[tracing::instrument(skip_all)]
   async fn register(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
      let email = Email::new(input.email)?;
      let name = UserName::new(input.name)?;
      let password = PlainPassword::for_registration(input.password)?;

      let mut session = self.sessions.open().await?;

      if self
         .user_repository
         .find_by_email(&mut session, &email)
         .await?
         .is_some()
      {
         return Err(DomainError::email_already_registered().into());
      }

      let password_hash = self.password_hasher.hash(&password)?;
      let user = User::new(UserId::new(), email, name, self.clock.now());

      self
         .user_repository
         .insert(&mut session, &user, &password_hash)
         .await
         .map_err(|e| {
            if e.is_conflict() {
               DomainError::email_already_registered().into()
            } else {
               ApiError::from(e)
            }
         })?;
      session.commit().await?;

      tracing::info!(user_id = %user.id(), "ユーザーを登録しました");
      self.issue(user)
   }

   #[tracing::instrument(skip_all)]
   async fn login(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
      if input.email.trim().is_empty() || input.password.is_empty() {
         return Err(ApiError::Validation(
            "メールアドレスとパスワードは必須です".to_string(),
         ));
      }
      let password = PlainPassword::new(input.password);

      // 形式が不正なメールアドレスは登録され得ないため、未登録と同じ扱いにする
      let Ok(email) = Email::new(input.email) else {
         self.password_hasher.verify_dummy(&password);
         return Err(ApiError::InvalidCredentials);
      };

      let mut session = self.sessions.open().await?;
      let credentials = self
         .user_repository
         .find_by_email(&mut session, &email)
         .await?;
      drop(session);

      let Some(credentials) = credentials else {
         self.password_hasher.verify_dummy(&password);
         return Err(ApiError::InvalidCredentials);
      };

      if !self
         .password_hasher
         .verify(&password, &credentials.password_hash)?
         .is_match()
      {
         return Err(ApiError::InvalidCredentials);
      }

      self.issue(credentials.user)
   }

   #[tracing::instrument(skip_all, fields(%user_id))]
   async fn current_user(&self, user_id: &UserId) -> Result<User, ApiError> {
      let mut session = self.sessions.open().await?;

      self
         .user_repository
         .find_by_id(&mut session, user_id)
         .await?
         .ok_or_else(|| ApiError::Unauthorized("ユーザーが存在しません".to_string()))
   }
}

/// トークンから主体を取り出す
///
/// 署名・期限・形式のいずれかが不正な場合は 401 になる。
pub fn authenticate(token_service: &dyn TokenService, token: &str) -> Result<TokenSubject, ApiError> {
   token_service.verify(token).map_err(|e| {
      if e.is_token_error() {
         tracing::debug!(error = %e, "トークンの検証に失敗しました");
         ApiError::Unauthorized("トークンが無効です".to_string())
      } else {
         ApiError::from(e)
      }
   })
}
