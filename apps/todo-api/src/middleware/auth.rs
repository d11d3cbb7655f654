//! # Bearer トークン認証ミドルウェア
//!
//! `Authorization: Bearer <token>` を検証し、認証済みユーザーを
//! リクエストの extensions に格納する。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let auth_state = AuthLayerState {
//!    token_service: token_service.clone(),
//! };
//!
//! Router::new()
//!    .route("/api/tasks", get(list_tasks))
//!    .layer(from_fn_with_state(auth_state, require_auth))
//! ```

use std::sync::Arc;

use axum::{
   body::Body,
   extract::State,
   http::{Request, header::AUTHORIZATION},
   middleware::Next,
   response::{IntoResponse, Response},
};
use todo_domain::user::{Email, UserId};
use todo_infra::TokenService;

use crate::{error::ApiError, usecase::auth::authenticate};

/// 認証済みユーザー
///
/// ハンドラでは `Extension<CurrentUser>` で受け取る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
   pub user_id: UserId,
   pub email:   Email,
}

/// 認証ミドルウェアの状態
#[derive(Clone)]
pub struct AuthLayerState {
   pub token_service: Arc<dyn TokenService>,
}

/// `Authorization` ヘッダから Bearer トークンを取り出す
///
/// スキーム名は大文字小文字を区別しない。
fn bearer_token(request: &Request<Body>) -> Option<&str> {
   let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
   let (scheme, token) = value.split_once(' ')?;
   let token = token.trim();
   (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// 認証ミドルウェア
///
/// トークンが無い、または検証に失敗した場合は 401 Unauthorized を返す。
pub async fn require_auth(
   State(state): State<AuthLayerState>,
   mut request: Request<Body>,
   next: Next,
) -> Response {
   let Some(token) = bearer_token(&request) else {
      return ApiError::Unauthorized("認証が必要です".to_string()).into_response();
   };

   let subject = match authenticate(state.token_service.as_ref(), token) {
      Ok(subject) => subject,
      Err(e) => return e.into_response(),
   };

   request.extensions_mut().insert(CurrentUser {
      user_id: subject.user_id,
      email:   subject.email,
   });

   next.run(request).await
}
