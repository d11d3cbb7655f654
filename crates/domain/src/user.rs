//! # ユーザー
//!
//! タスクの所有者となるユーザーを定義する。
//! 認証情報（パスワードハッシュ）はエンティティに含めず、リポジトリが別途扱う。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use todo_domain::user::{Email, User, UserId, UserName};
//!
//! let user = User::new(
//!     UserId::new(),
//!     Email::new("Alice@Example.com")?,
//!     UserName::new("Alice")?,
//!     chrono::Utc::now(),
//! );
//!
//! assert_eq!(user.email().as_str(), "alice@example.com");
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

define_uuid_id! {
   /// ユーザー ID（UUID v7）
   pub struct UserId;
}

/// メールアドレスの最大文字数
const EMAIL_MAX_LENGTH: usize = 255;

/// メールアドレス
///
/// 前後の空白を除去し、小文字に正規化して保持する。
/// 一意性の判定はこの正規化後の値で行う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
   /// メールアドレスを作成する
   ///
   /// # バリデーション
   ///
   /// - 空文字列ではない
   /// - `local@domain` の形式で、domain に `.` を含む
   /// - 空白を含まない
   /// - 最大 255 文字
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into().trim().to_lowercase();

      if value.is_empty() {
         return Err(DomainError::Validation(
            "メールアドレスは必須です".to_string(),
         ));
      }

      if value.chars().count() > EMAIL_MAX_LENGTH {
         return Err(DomainError::Validation(format!(
            "メールアドレスは {EMAIL_MAX_LENGTH} 文字以内である必要があります"
         )));
      }

      let Some((local, domain)) = value.split_once('@') else {
         return Err(invalid_email());
      };

      if local.is_empty()
         || domain.is_empty()
         || domain.contains('@')
         || !domain.contains('.')
         || domain.starts_with('.')
         || domain.ends_with('.')
         || value.chars().any(char::is_whitespace)
      {
         return Err(invalid_email());
      }

      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn into_string(self) -> String {
      self.0
   }
}

fn invalid_email() -> DomainError {
   DomainError::Validation("メールアドレスの形式が不正です".to_string())
}

impl std::fmt::Display for Email {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

define_validated_string! {
   /// ユーザー表示名（1〜100 文字）
   pub struct UserName {
      label: "ユーザー名",
      max_chars: 100,
      pii: true,
   }
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
   id:         UserId,
   email:      Email,
   name:       UserName,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl User {
   /// 新しいユーザーを作成する
   pub fn new(id: UserId, email: Email, name: UserName, now: DateTime<Utc>) -> Self {
      Self {
         id,
         email,
         name,
         created_at: now,
         updated_at: now,
      }
   }

   /// 既存のデータから復元する
   pub fn from_db(
      id: UserId,
      email: Email,
      name: UserName,
      created_at: DateTime<Utc>,
      updated_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         email,
         name,
         created_at,
         updated_at,
      }
   }

   pub fn id(&self) -> &UserId {
      &self.id
   }

   pub fn email(&self) -> &Email {
      &self.email
   }

   pub fn name(&self) -> &UserName {
      &self.name
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}
