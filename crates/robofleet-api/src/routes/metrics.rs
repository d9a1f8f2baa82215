//! Metrics endpoints

use axum::{Json, extract::State};
use chrono::Utc;
use robofleet_core::FleetMetrics;

use crate::dto::{UptimeResponse, UptimeSession, format_uptime};
use crate::state::AppState;

/// `GET /api/metrics`
pub async fn fleet_metrics(State(state): State<AppState>) -> Json<FleetMetrics> {
    Json(state.registry.metrics().await)
}

/// `GET /api/metrics/uptime`
pub async fn uptime(State(state): State<AppState>) -> Json<UptimeResponse> {
    let uptime = state.uptime();

    Json(UptimeResponse {
        current_session: UptimeSession {
            seconds: uptime.as_secs_f64(),
            formatted: format_uptime(uptime.as_secs()),
        },
        timestamp: Utc::now(),
    })
}
