/// UUID v7 をラップした ID 型を定義する
///
/// 生成される API:
/// - `new()`: 新しい ID（時刻順にソート可能な UUID v7）
/// - `from_uuid()` / `as_uuid()`: DB 行との相互変換
/// - `Display`: ハイフン区切りの UUID 文字列
///
/// ```rust
/// use todo_domain::task::TaskId;
///
/// let id = TaskId::new();
/// assert_eq!(TaskId::from_uuid(*id.as_uuid()), id);
/// assert_eq!(id.to_string().len(), 36);
/// ```
macro_rules! define_uuid_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[serde(transparent)]
      #[display("{_0}")]
      $vis struct $Name(uuid::Uuid);

      impl $Name {
         pub fn new() -> Self {
            Self(uuid::Uuid::now_v7())
         }

         pub fn from_uuid(uuid: uuid::Uuid) -> Self {
            Self(uuid)
         }

         pub fn as_uuid(&self) -> &uuid::Uuid {
            &self.0
         }
      }

      impl Default for $Name {
         fn default() -> Self {
            Self::new()
         }
      }
   };
}

/// 入力文字列を検証して保持する値オブジェクトを定義する
///
/// `new()` は前後の空白を取り除き、空文字と `max_chars` 超過を
/// [`DomainError::Validation`](crate::DomainError::Validation) として拒否する。
/// 文字数は Unicode スカラー値で数える。
///
/// `pii: true` を付けた型は `Debug` が `[REDACTED]` になり、`Display` を持たない。
macro_rules! define_validated_string {
   (@type $(#[$meta:meta])* $vis:vis $Name:ident, $label:literal, $max:literal) => {
      $(#[$meta])*
      #[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
      #[serde(transparent)]
      $vis struct $Name(String);

      impl $Name {
         /// 最大文字数
         pub const MAX_CHARS: usize = $max;

         pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
            let raw = value.into();
            let trimmed = raw.trim();

            if trimmed.is_empty() {
               return Err($crate::DomainError::Validation(
                  concat!($label, "を入力してください").to_string(),
               ));
            }
            if trimmed.chars().count() > Self::MAX_CHARS {
               return Err($crate::DomainError::Validation(format!(
                  concat!($label, "は {} 文字以内で入力してください"),
                  Self::MAX_CHARS
               )));
            }

            Ok(Self(trimmed.to_string()))
         }

         pub fn as_str(&self) -> &str {
            &self.0
         }

         pub fn into_string(self) -> String {
            self.0
         }
      }
   };

   (@debug redacted $Name:ident) => {
      impl std::fmt::Debug for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple(stringify!($Name)).field(&"[REDACTED]").finish()
         }
      }
   };

   (@debug plain $Name:ident) => {
      impl std::fmt::Debug for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_tuple(stringify!($Name)).field(&self.0).finish()
         }
      }

      impl std::fmt::Display for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
         }
      }
   };

   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:literal,
         max_chars: $max:literal,
         pii: true $(,)?
      }
   ) => {
      define_validated_string!(@type $(#[$meta])* $vis $Name, $label, $max);
      define_validated_string!(@debug redacted $Name);
   };
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:literal,
         max_chars: $max:literal $(,)?
      }
   ) => {
      define_validated_string!(@type $(#[$meta])* $vis $Name, $label, $max);
      define_validated_string!(@debug plain $Name);
   };
}
