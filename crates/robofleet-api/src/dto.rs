//! Request/Response types

use chrono::{DateTime, Utc};
use robofleet_core::{NewRobot, Robot};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

// ============================================================================
// Robots
// ============================================================================

/// `POST /api/robots` のボディ
///
/// 必須チェックはハンドラ側で行うため、すべて Option で受ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRobotRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub robot_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl CreateRobotRequest {
    pub fn into_new_robot(self) -> ApiResult<NewRobot> {
        Ok(NewRobot::from_parts(
            self.name,
            self.robot_type,
            self.location,
        )?)
    }
}

/// `GET /api/robots` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotListResponse {
    pub count: usize,
    pub robots: Vec<Robot>,
}

impl From<Vec<Robot>> for RobotListResponse {
    fn from(robots: Vec<Robot>) -> Self {
        Self {
            count: robots.len(),
            robots,
        }
    }
}

/// JSON ボディをパースする
///
/// 空ボディは `{}` として扱う。パース失敗は 400 Validation failed。
pub fn parse_json_body<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

// ============================================================================
// Service info / Health
// ============================================================================

/// `GET /` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub documentation: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub health: String,
    pub robots: String,
    pub metrics: String,
}

/// `GET /api/health` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    /// 起動からの秒数
    pub uptime: f64,
    pub environment: String,
    /// 現在登録されているロボット数
    pub robots: usize,
}

/// `GET /api/health/live` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/health/ready` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessChecks {
    /// `ok` または `timeout`
    pub registry: String,
    /// 確認時点のロボット数（タイムアウト時は省略）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robots: Option<usize>,
}

/// `GET /api/health/version` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: String,
    /// ビルド時の最小 Rust バージョン（`rust-version`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rust_version: Option<String>,
    pub environment: String,
    pub build_date: String,
    pub commit_sha: String,
}

// ============================================================================
// Metrics
// ============================================================================

/// `GET /api/metrics/uptime` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeResponse {
    pub current_session: UptimeSession,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UptimeSession {
    pub seconds: f64,
    pub formatted: String,
}

/// 秒数を `1d 2h 3m 4s` 形式に整形する
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use robofleet_core::MaintenanceRequest;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0d 0h 0m 0s");
        assert_eq!(format_uptime(59), "0d 0h 0m 59s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
    }

    #[test]
    fn test_parse_json_body_empty_is_default() {
        let request: MaintenanceRequest = parse_json_body(b"").unwrap();
        assert_eq!(request, MaintenanceRequest::default());

        let request: MaintenanceRequest = parse_json_body(b"  \n").unwrap();
        assert_eq!(request, MaintenanceRequest::default());
    }

    #[test]
    fn test_parse_json_body_malformed() {
        let result: ApiResult<MaintenanceRequest> = parse_json_body(b"{not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_validation() {
        let request: CreateRobotRequest =
            parse_json_body(br#"{"name": "Only Name"}"#).unwrap();
        assert!(request.into_new_robot().is_err());

        let request: CreateRobotRequest =
            parse_json_body(br#"{"name": "Bot", "type": "testing"}"#).unwrap();
        let new = request.into_new_robot().unwrap();
        assert_eq!(new.robot_type, "testing");
        assert!(new.location.is_none());
    }
}
