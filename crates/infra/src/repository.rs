//! # リポジトリ実装
//!
//! ユーザーとタスクの永続化を担当する。
//!
//! すべてのメソッドは [`DbSession`](crate::db::DbSession) を受け取り、
//! そのセッションのトランザクション内でクエリを実行する。
//! 確定するかどうかは呼び出し側（ユースケース層）が決める。

pub mod task_repository;
pub mod user_repository;

pub use task_repository::{PostgresTaskRepository, TaskRepository};
pub use user_repository::{PostgresUserRepository, UserCredentials, UserRepository};
