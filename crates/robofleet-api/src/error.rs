//! API エラー型
//!
//! すべてのエラーは構造化 JSON として呼び出し元に返す。

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use robofleet_config::Environment;
use robofleet_core::RegistryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 本番環境で内部エラーの代わりに返すメッセージ
pub const HIDDEN_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// API エラー
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Robot not found: {0}")]
    RobotNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Route {method} {path} not found")]
    RouteNotFound { method: String, path: String },

    #[error("Internal error: {message}")]
    Internal { message: String, expose: bool },
}

impl ApiError {
    /// 本番環境ではメッセージを隠す内部エラー
    pub fn internal(message: impl Into<String>, environment: Environment) -> Self {
        ApiError::Internal {
            message: message.into(),
            expose: !environment.is_production(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RobotNotFound(_) | ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => ApiError::RobotNotFound(id),
            RegistryError::Validation(message) => ApiError::Validation(message),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// エラーレスポンスボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robot_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::RobotNotFound(id) => ErrorResponse {
                error: "Robot not found".to_string(),
                message: None,
                robot_id: Some(id),
                timestamp: None,
            },
            ApiError::Validation(message) => ErrorResponse {
                error: "Validation failed".to_string(),
                message: Some(message),
                robot_id: None,
                timestamp: None,
            },
            ApiError::RouteNotFound { method, path } => ErrorResponse {
                error: "Not Found".to_string(),
                message: Some(format!("Route {} {} not found", method, path)),
                robot_id: None,
                timestamp: Some(Utc::now()),
            },
            ApiError::Internal { message, expose } => {
                tracing::error!(error = %message, "Unhandled error");
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: Some(if expose {
                        message
                    } else {
                        HIDDEN_ERROR_MESSAGE.to_string()
                    }),
                    robot_id: None,
                    timestamp: Some(Utc::now()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;
