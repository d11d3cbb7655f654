//! # Todo API インフラ層
//!
//! PostgreSQL、パスワードハッシュ、トークン署名といった外部要素との接続を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: 接続プール（[`db::Engine`]）とリクエスト単位のセッション
//! - **リポジトリ実装**: ユーザー・タスクの永続化
//! - **認証基盤**: Argon2id によるパスワードハッシュ、HS256 署名のアクセストークン
//!
//! ## 依存関係
//!
//! ```text
//! todo-api → infra → domain
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use todo_infra::db::{Engine, PgSessionFactory, SessionFactory};
//!
//! async fn setup(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = Engine::connect_lazy(url, false)?;
//!     let sessions = PgSessionFactory::new(engine.pool().clone());
//!
//!     let session = sessions.open().await?;
//!     session.commit().await?;
//!
//!     engine.dispose().await;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod password;
pub mod repository;
pub mod token;

pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use token::{JwtTokenService, TokenService};
