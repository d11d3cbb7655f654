//! # ユースケース層
//!
//! Todo API のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリ・ハッシュ・トークン・時刻を `Arc<dyn Trait>` で注入
//! - **セッション境界**: 1 回の呼び出しで 1 つの [`DbSession`](todo_infra::db::DbSession)
//!   を開き、書き込みがある場合だけ明示的に `commit()` する
//! - **薄いハンドラ**: ハンドラは DTO 変換のみを行い、ロジックはここに集約する

pub mod auth;
pub mod task;

pub use auth::{AuthOutput, AuthUseCase, AuthUseCaseImpl, LoginInput, RegisterInput};
pub use task::{CreateTaskInput, TaskUseCase, TaskUseCaseImpl, UpdateTaskInput};
