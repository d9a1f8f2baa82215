//! Robot endpoints

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use robofleet_core::{MaintenanceRequest, MaintenanceTicket, Robot, RobotFilter, RobotPatch};

use crate::dto::{CreateRobotRequest, RobotListResponse, parse_json_body};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/robots`
///
/// クエリ文字列が解釈できない場合（同じキーの重複など）は 400 Validation failed。
pub async fn list_robots(
    State(state): State<AppState>,
    query: Result<Query<RobotFilter>, QueryRejection>,
) -> ApiResult<Json<RobotListResponse>> {
    let Query(filter) = query?;
    let robots = state.registry.list(&filter).await;
    Ok(Json(robots.into()))
}

/// `GET /api/robots/{id}`
pub async fn get_robot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Robot>> {
    Ok(Json(state.registry.get(&id).await?))
}

/// `POST /api/robots`
pub async fn create_robot(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Robot>)> {
    let request: CreateRobotRequest = parse_json_body(&body)?;
    let robot = state.registry.create(request.into_new_robot()?).await;
    Ok((StatusCode::CREATED, Json(robot)))
}

/// `PUT /api/robots/{id}`
///
/// name / status / location / batteryLevel 以外のキーは無視される。
pub async fn update_robot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Robot>> {
    let patch: RobotPatch = parse_json_body(&body)?;
    Ok(Json(state.registry.update(&id, patch).await?))
}

/// `DELETE /api/robots/{id}`
pub async fn delete_robot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.registry.delete(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::RobotNotFound(id))
    }
}

/// `POST /api/robots/{id}/maintenance`
pub async fn schedule_maintenance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<MaintenanceTicket>> {
    let request: MaintenanceRequest = parse_json_body(&body)?;
    Ok(Json(state.registry.schedule_maintenance(&id, request).await?))
}
