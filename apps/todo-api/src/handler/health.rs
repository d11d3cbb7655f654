//! # ヘルスチェックハンドラ
//!
//! - `/`: API 名とバージョン
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（DB の接続状態を確認）

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use todo_infra::{InfraError, db::Engine};
use todo_shared::{CheckStatus, HealthResponse, ReadinessResponse};

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// `GET /` のレスポンス
#[derive(Debug, Serialize)]
pub struct RootResponse {
   pub message: &'static str,
   pub version: &'static str,
}

/// API 名とバージョンを返す
pub async fn root() -> Json<RootResponse> {
   Json(RootResponse {
      message: "Todo API - Task CRUD functionality",
      version: env!("CARGO_PKG_VERSION"),
   })
}

/// Liveness Check
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy())
}

/// Readiness Check で疎通を確認する対象
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
   async fn ping(&self) -> Result<(), InfraError>;
}

#[async_trait]
impl ReadinessProbe for Engine {
   async fn ping(&self) -> Result<(), InfraError> {
      Engine::ping(self).await
   }
}

/// Readiness Check 用の State
pub struct ReadinessState {
   pub database: Arc<dyn ReadinessProbe>,
}

/// Readiness Check
///
/// DB に `SELECT 1` を送り、5 秒以内に応答があれば 200、なければ 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let database = match tokio::time::timeout(READINESS_TIMEOUT, state.database.ping()).await {
      Ok(Ok(())) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: database ping failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: database check timed out");
         CheckStatus::Error
      }
   };

   let response = ReadinessResponse::from_checks([("database", database)]);
   let status = if response.is_ready() {
      StatusCode::OK
   } else {
      StatusCode::SERVICE_UNAVAILABLE
   };

   (status, Json(response))
}
