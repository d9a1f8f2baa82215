//! API route handlers

pub mod health;
pub mod metrics;
pub mod robots;

use std::path::Path;

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    http::{Method, Uri},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::state::AppState;

/// Create the API router
///
/// 未定義ルートと未対応メソッドは JSON の 404 を返す。
pub fn create_router(state: AppState) -> Router {
    api_routes()
        .method_not_allowed_fallback(route_not_found)
        .fallback(route_not_found)
        .with_state(state)
}

/// 静的ファイルをフォールバックに配信するルーター
///
/// `static_dir` に存在しないパスは JSON の 404 になる。
pub fn create_router_with_static(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(route_not_found.into_service());

    api_routes()
        .method_not_allowed_fallback(route_not_found)
        .fallback_service(static_files)
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::service_info))
        // Health endpoints
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::liveness))
        .route("/api/health/ready", get(health::readiness))
        .route("/api/health/version", get(health::version))
        // Robot endpoints
        .route(
            "/api/robots",
            get(robots::list_robots).post(robots::create_robot),
        )
        .route(
            "/api/robots/{id}",
            get(robots::get_robot)
                .put(robots::update_robot)
                .delete(robots::delete_robot),
        )
        .route(
            "/api/robots/{id}/maintenance",
            post(robots::schedule_maintenance),
        )
        // Metrics endpoints
        .route("/api/metrics", get(metrics::fleet_metrics))
        .route("/api/metrics/uptime", get(metrics::uptime))
}

/// 未定義ルートの 404
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
