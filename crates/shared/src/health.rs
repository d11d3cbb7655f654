//! # ヘルスチェック応答
//!
//! `/health` は固定の `{"status": "healthy"}`、`/health/ready` は
//! 依存先ごとの結果と全体の可否を返す。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `/health` の応答本文
///
/// 外部の死活監視が文字列一致で見ているため、フィールドは増やさない。
///
/// ```
/// use todo_shared::HealthResponse;
///
/// let body = serde_json::to_string(&HealthResponse::healthy()).unwrap();
/// assert_eq!(body, r#"{"status":"healthy"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// 依存先 1 つ分の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

impl From<bool> for CheckStatus {
    fn from(reachable: bool) -> Self {
        if reachable { Self::Ok } else { Self::Error }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// `/health/ready` の応答本文
///
/// `checks` はキー順に並ぶ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
    /// 依存先の結果を集約する。1 つでも `Error` なら `NotReady`
    pub fn from_checks<I, K>(checks: I) -> Self
    where
        I: IntoIterator<Item = (K, CheckStatus)>,
        K: Into<String>,
    {
        let checks: BTreeMap<String, CheckStatus> =
            checks.into_iter().map(|(name, s)| (name.into(), s)).collect();
        let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
