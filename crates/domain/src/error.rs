//! # ドメインエラー
//!
//! | 種別 | HTTP | 発生箇所 |
//! |------|------|----------|
//! | `Validation` | 400 | 値オブジェクトの生成 |
//! | `NotFound` | 404 | 存在しない、または他ユーザーのタスク |
//! | `Conflict` | 409 | 登録済みのメールアドレス |
//!
//! ```rust
//! use todo_domain::{DomainError, task::TaskTitle};
//!
//! assert!(matches!(TaskTitle::new("  "), Err(DomainError::Validation(_))));
//! ```

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// 所有者以外からの参照もこれになる。存在するかどうかは応答から区別できない
   #[error("{entity_type} が見つかりません: {id}")]
   NotFound {
      entity_type: &'static str,
      id:          String,
   },

   #[error("競合が発生しました: {0}")]
   Conflict(String),
}

impl DomainError {
   pub fn task_not_found(id: impl std::fmt::Display) -> Self {
      Self::NotFound {
         entity_type: "Task",
         id:          id.to_string(),
      }
   }

   pub fn email_already_registered() -> Self {
      Self::Conflict("このメールアドレスは既に登録されています".to_string())
   }
}
