//! # Todo API エラー定義
//!
//! ユースケース・ハンドラで発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンス本文は RFC 9457 Problem Details（[`ErrorResponse`]）。
//! 内部エラーの詳細はログにのみ出力し、クライアントには固定文言を返す。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use thiserror::Error;
use todo_domain::DomainError;
use todo_infra::InfraError;
use todo_shared::{ErrorResponse, ProblemKind};

/// Todo API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// 入力値の検証失敗
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// 認証が必要、またはトークンが無効
   #[error("認証エラー: {0}")]
   Unauthorized(String),

   /// メールアドレスまたはパスワードが一致しない
   #[error("メールアドレスまたはパスワードが正しくありません")]
   InvalidCredentials,

   /// リソースが見つからない（他ユーザーの所有物を含む）
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 一意制約の競合
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for ApiError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => Self::Validation(msg),
         DomainError::NotFound { entity_type, id } => {
            Self::NotFound(format!("{entity_type} が見つかりません: {id}"))
         }
         DomainError::Conflict(msg) => Self::Conflict(msg),
      }
   }
}

impl ApiError {
   fn to_problem(&self) -> ErrorResponse {
      match self {
         ApiError::Validation(msg) => ErrorResponse::new(ProblemKind::Validation, msg),
         ApiError::Unauthorized(msg) => ErrorResponse::new(ProblemKind::Unauthorized, msg),
         ApiError::InvalidCredentials => ErrorResponse::new(
            ProblemKind::AuthenticationFailed,
            "メールアドレスまたはパスワードが正しくありません",
         ),
         ApiError::NotFound(msg) => ErrorResponse::new(ProblemKind::NotFound, msg),
         ApiError::Conflict(msg) => ErrorResponse::new(ProblemKind::Conflict, msg),
         ApiError::Database(e) => {
            tracing::error!(error = ?e, "データベースエラー");
            ErrorResponse::internal_error()
         }
         ApiError::Internal(msg) => {
            tracing::error!("内部エラー: {}", msg);
            ErrorResponse::internal_error()
         }
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      let problem = self.to_problem();
      let status =
         StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

      let mut response = (status, Json(problem)).into_response();
      if status == StatusCode::UNAUTHORIZED {
         response.headers_mut().insert(
            axum::http::header::WWW_AUTHENTICATE,
            axum::http::HeaderValue::from_static("Bearer"),
         );
      }
      response
   }
}
