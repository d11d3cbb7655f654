//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! Todo API が返すエラー本文を定義する。
//!
//! 問題の種類は [`ProblemKind`] で列挙し、`type` URI・タイトル・ステータスの
//! 組を 1 か所で管理する。axum への変換は todo-api 側で行う。

use serde::{Deserialize, Serialize};

/// `type` URI のベースパス
const ERROR_TYPE_BASE: &str = "https://todo-api.example.com/errors";

/// Todo API が返す問題の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
   /// 入力値の検証失敗
   Validation,
   /// トークンが無い、または無効
   Unauthorized,
   /// メールアドレスまたはパスワードの不一致
   AuthenticationFailed,
   /// 対象が存在しない（他ユーザーの所有物を含む）
   NotFound,
   /// 一意制約の競合
   Conflict,
   /// 内部エラー
   Internal,
}

impl ProblemKind {
   /// `type` URI の末尾
   pub fn slug(self) -> &'static str {
      match self {
         Self::Validation => "validation-error",
         Self::Unauthorized => "unauthorized",
         Self::AuthenticationFailed => "authentication-failed",
         Self::NotFound => "not-found",
         Self::Conflict => "conflict",
         Self::Internal => "internal-error",
      }
   }

   pub fn title(self) -> &'static str {
      match self {
         Self::Validation => "Validation Error",
         Self::Unauthorized => "Unauthorized",
         Self::AuthenticationFailed => "Authentication Failed",
         Self::NotFound => "Not Found",
         Self::Conflict => "Conflict",
         Self::Internal => "Internal Server Error",
      }
   }

   pub fn status(self) -> u16 {
      match self {
         Self::Validation => 400,
         Self::Unauthorized | Self::AuthenticationFailed => 401,
         Self::NotFound => 404,
         Self::Conflict => 409,
         Self::Internal => 500,
      }
   }
}

/// エラーレスポンス本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   #[serde(rename = "type")]
   pub error_type: String,
   pub title:      String,
   pub status:     u16,
   pub detail:     String,
}

impl ErrorResponse {
   pub fn new(kind: ProblemKind, detail: impl Into<String>) -> Self {
      Self {
         error_type: format!("{ERROR_TYPE_BASE}/{}", kind.slug()),
         title:      kind.title().to_string(),
         status:     kind.status(),
         detail:     detail.into(),
      }
   }

   /// 500 Internal Server Error
   ///
   /// detail は固定文言。原因はログにのみ出力する。
   pub fn internal_error() -> Self {
      Self::new(ProblemKind::Internal, "内部エラーが発生しました")
   }
}
