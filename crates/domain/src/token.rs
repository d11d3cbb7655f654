//! # アクセストークン
//!
//! 認証済みユーザーに発行する Bearer トークンと、
//! トークンから復元される主体情報を定義する。
//! 署名・検証の方式はインフラ層が決める。

use chrono::{DateTime, Utc};

use crate::user::{Email, UserId};

/// 署名済みアクセストークン
///
/// Debug 出力ではトークン文字列をマスクする。
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl std::fmt::Debug for AccessToken {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
   }
}

impl AccessToken {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn into_string(self) -> String {
      self.0
   }
}

/// 発行済みトークンと有効期限
#[derive(Debug, Clone)]
pub struct IssuedToken {
   pub token:      AccessToken,
   pub expires_at: DateTime<Utc>,
}

/// 検証済みトークンから取り出した主体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
   pub user_id: UserId,
   pub email:   Email,
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_アクセストークンのdebug出力はマスクされる() {
      let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.payload.signature");
      let debug = format!("{token:?}");

      assert!(debug.contains("[REDACTED]"));
      assert!(!debug.contains("payload"));
   }
}
