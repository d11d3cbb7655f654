//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/register` - ユーザー登録
//! - `POST /api/auth/login` - ログイン
//! - `GET /api/auth/me` - ログイン中のユーザー（要 Bearer トークン）

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todo_domain::user::User;
use uuid::Uuid;

use crate::{
   error::ApiError,
   middleware::CurrentUser,
   usecase::{AuthOutput, AuthUseCase, LoginInput, RegisterInput},
};

/// 認証ハンドラの共有状態
pub struct AuthState {
   pub usecase: Arc<dyn AuthUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// ユーザー登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
   pub email:    String,
   pub password: String,
   pub name:     String,
}

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
   pub email:    String,
   pub password: String,
}

/// ユーザー情報
#[derive(Debug, Serialize)]
pub struct UserRead {
   pub id:         Uuid,
   pub email:      String,
   pub name:       String,
   pub created_at: DateTime<Utc>,
}

impl From<&User> for UserRead {
   fn from(user: &User) -> Self {
      Self {
         id:         *user.id().as_uuid(),
         email:      user.email().as_str().to_string(),
         name:       user.name().as_str().to_string(),
         created_at: user.created_at(),
      }
   }
}

/// 登録・ログインのレスポンス
#[derive(Debug, Serialize)]
pub struct TokenResponse {
   pub access_token: String,
   pub token_type:   &'static str,
   pub expires_at:   DateTime<Utc>,
   pub user:         UserRead,
}

impl From<AuthOutput> for TokenResponse {
   fn from(output: AuthOutput) -> Self {
      Self {
         user:         UserRead::from(&output.user),
         access_token: output.token.token.into_string(),
         token_type:   "bearer",
         expires_at:   output.token.expires_at,
      }
   }
}

// --- ハンドラ ---

/// POST /api/auth/register
pub async fn register(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let output = state
      .usecase
      .register(RegisterInput {
         email:    req.email,
         password: req.password,
         name:     req.name,
      })
      .await?;

   Ok((StatusCode::CREATED, Json(TokenResponse::from(output))))
}

/// POST /api/auth/login
///
/// メールアドレスが未登録の場合もパスワード不一致と同じ 401 を返す。
pub async fn login(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let output = state
      .usecase
      .login(LoginInput {
         email:    req.email,
         password: req.password,
      })
      .await?;

   Ok(Json(TokenResponse::from(output)))
}

/// GET /api/auth/me
pub async fn me(
   State(state): State<Arc<AuthState>>,
   Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
   let user = state.usecase.current_user(&current.user_id).await?;

   Ok(Json(UserRead::from(&user)))
}
