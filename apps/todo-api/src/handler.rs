//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケース層に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ルート情報、ヘルスチェック
//! - `auth`: 登録、ログイン、ログイン中ユーザー
//! - `task`: タスク CRUD

pub mod auth;
pub mod health;
pub mod task;

pub use auth::{AuthState, login, me, register};
pub use health::{ReadinessProbe, ReadinessState, health_check, readiness_check, root};
pub use task::{
   TaskState,
   create_task,
   delete_task,
   get_task,
   list_tasks,
   toggle_task,
   update_task,
};
