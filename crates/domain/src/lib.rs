//! # Todo API ドメイン層
//!
//! タスク管理の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（[`task::Task`], [`user::User`]）
//! - **値オブジェクト**: 生成時に検証される不変オブジェクト（[`task::TaskTitle`],
//!   [`user::Email`] など）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! todo-api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、暗号ライブラリ）に一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use todo_domain::{
//!     task::{NewTask, Task, TaskId, TaskTitle},
//!     user::UserId,
//! };
//!
//! let owner = UserId::new();
//! let task = Task::new(NewTask {
//!     id:          TaskId::new(),
//!     user_id:     owner.clone(),
//!     title:       TaskTitle::new("牛乳を買う")?,
//!     description: None,
//!     now:         chrono::Utc::now(),
//! });
//!
//! assert!(task.is_owned_by(&owner));
//! assert!(!task.completed());
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod password;
pub mod task;
pub mod token;
pub mod user;

pub use error::DomainError;
