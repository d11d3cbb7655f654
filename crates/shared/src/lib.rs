//! # Todo API 共有ユーティリティ
//!
//! ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, todo-api）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum などの Web フレームワークには依存しない

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{ErrorResponse, ProblemKind};
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
