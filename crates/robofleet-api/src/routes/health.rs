//! Health check endpoints

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::warn;

use crate::dto::{
    Endpoints, HealthResponse, LivenessResponse, ReadinessChecks, ReadinessResponse,
    ServiceInfoResponse, VersionResponse,
};
use crate::state::{AppState, SERVICE_NAME};

/// ビルド日時を渡す環境変数
pub const BUILD_DATE_ENV: &str = "BUILD_DATE";

/// コミットSHAを渡す環境変数
pub const COMMIT_SHA_ENV: &str = "COMMIT_SHA";

const UNKNOWN: &str = "unknown";

/// レジストリのロック取得を待つ上限
const READINESS_TIMEOUT: Duration = Duration::from_secs(2);

/// `GET /`
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: "RoboFleet API".to_string(),
        version: state.version.clone(),
        environment: state.environment.to_string(),
        documentation: "/api/health".to_string(),
        endpoints: Endpoints {
            health: "/api/health".to_string(),
            robots: "/api/robots".to_string(),
            metrics: "/api/metrics".to_string(),
        },
    })
}

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
        uptime: state.uptime().as_secs_f64(),
        environment: state.environment.to_string(),
        robots: state.registry.len().await,
    })
}

/// `GET /api/health/live`
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
        timestamp: Utc::now(),
    })
}

/// `GET /api/health/ready`
///
/// レジストリのロックが時間内に取得できれば ready、できなければ 503。
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    match tokio::time::timeout(READINESS_TIMEOUT, state.registry.len()).await {
        Ok(robots) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                checks: ReadinessChecks {
                    registry: "ok".to_string(),
                    robots: Some(robots),
                },
                timestamp: Utc::now(),
            }),
        ),
        Err(_) => {
            warn!(timeout = ?READINESS_TIMEOUT, "Registry lock not acquired");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    checks: ReadinessChecks {
                        registry: "timeout".to_string(),
                        robots: None,
                    },
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}

/// `GET /api/health/version`
pub async fn version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.version.clone(),
        rust_version: option_env!("CARGO_PKG_RUST_VERSION")
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        environment: state.environment.to_string(),
        build_date: std::env::var(BUILD_DATE_ENV).unwrap_or_else(|_| UNKNOWN.to_string()),
        commit_sha: std::env::var(COMMIT_SHA_ENV).unwrap_or_else(|_| UNKNOWN.to_string()),
    })
}
