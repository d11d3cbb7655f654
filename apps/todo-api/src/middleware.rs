//! # ミドルウェア
//!
//! Todo API 用のミドルウェアを提供する。

mod auth;

pub use auth::{AuthLayerState, CurrentUser, require_auth};
