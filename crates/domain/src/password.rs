//! # パスワード
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`PlainPassword`] | 登録・ログイン時の入力値 |
//! | [`PasswordHash`] | 永続化用のハッシュ値 |
//! | [`PasswordVerifyResult`] | パスワード検証の成否 |
//!
//! ハッシュ化そのものはインフラ層（Argon2id）が担当する。

use crate::DomainError;

/// 登録時に要求するパスワードの最小文字数
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// パスワードの最大文字数
///
/// Argon2 への入力が極端に長くなるのを防ぐ。
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// 平文パスワード
///
/// Debug 出力では値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
   }
}

impl PlainPassword {
   /// 検証なしで作成する
   ///
   /// ログイン時の入力値に使う。長さで弾くと、登録済みかどうかに関係なく
   /// エラー応答が変わってしまうため、照合はハッシュ検証に任せる。
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 新規登録用のパスワードとして検証した上で作成する
   ///
   /// 前後の空白は除去しない（パスワードの一部として扱う）。
   pub fn for_registration(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();
      let length = value.chars().count();

      if length < MIN_PASSWORD_LENGTH {
         return Err(DomainError::Validation(format!(
            "パスワードは {MIN_PASSWORD_LENGTH} 文字以上である必要があります"
         )));
      }
      if length > MAX_PASSWORD_LENGTH {
         return Err(DomainError::Validation(format!(
            "パスワードは {MAX_PASSWORD_LENGTH} 文字以内である必要があります"
         )));
      }

      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// パスワードハッシュ（PHC 文字列形式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
   /// ハッシュ文字列からインスタンスを作成する
   ///
   /// 主にデータベースからの復元時に使用する。
   pub fn new(hash: impl Into<String>) -> Self {
      Self(hash.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn into_string(self) -> String {
      self.0
   }
}

/// パスワード検証結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
   Match,
   Mismatch,
}

impl PasswordVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }
}

impl From<bool> for PasswordVerifyResult {
   fn from(matched: bool) -> Self {
      if matched { Self::Match } else { Self::Mismatch }
   }
}
