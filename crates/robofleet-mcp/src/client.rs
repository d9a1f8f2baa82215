//! RoboFleet HTTP API クライアント
//!
//! 各メソッドは API の JSON レスポンスをそのまま `serde_json::Value` で返す。

use reqwest::{Method, StatusCode, Url};
use robofleet_core::RobotPatch;
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ClientError, Result};

/// HTTP API クライアント
#[derive(Debug, Clone)]
pub struct RobotApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl RobotApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/robots`
    pub async fn list_robots(&self, status: Option<&str>, location: Option<&str>) -> Result<Value> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status));
        }
        if let Some(location) = location {
            query.push(("location", location));
        }
        self.request(Method::GET, &["api", "robots"], &query, None)
            .await
    }

    /// `GET /api/robots/{id}`
    pub async fn get_robot(&self, id: &str) -> Result<Value> {
        self.request(Method::GET, &robot_segments(id)?, &[], None)
            .await
    }

    /// `POST /api/robots`
    pub async fn create_robot(
        &self,
        name: &str,
        robot_type: &str,
        location: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({ "name": name, "type": robot_type });
        if let Some(location) = location {
            body["location"] = json!(location);
        }
        self.request(Method::POST, &["api", "robots"], &[], Some(&body))
            .await
    }

    /// `PUT /api/robots/{id}`
    pub async fn update_robot(&self, id: &str, patch: &RobotPatch) -> Result<Value> {
        let body = serde_json::to_value(patch).unwrap_or_else(|_| json!({}));
        self.request(Method::PUT, &robot_segments(id)?, &[], Some(&body))
            .await
    }

    /// `DELETE /api/robots/{id}`
    ///
    /// 204 は `{"success": true}` として返す。
    pub async fn delete_robot(&self, id: &str) -> Result<Value> {
        self.request(Method::DELETE, &robot_segments(id)?, &[], None)
            .await
    }

    /// `POST /api/robots/{id}/maintenance`
    pub async fn schedule_maintenance(
        &self,
        id: &str,
        maintenance_type: Option<&str>,
        scheduled_date: Option<&str>,
    ) -> Result<Value> {
        let mut body = json!({});
        if let Some(maintenance_type) = maintenance_type {
            body["type"] = json!(maintenance_type);
        }
        if let Some(scheduled_date) = scheduled_date {
            body["scheduledDate"] = json!(scheduled_date);
        }
        let mut segments = robot_segments(id)?;
        segments.push("maintenance");
        self.request(Method::POST, &segments, &[], Some(&body))
            .await
    }

    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "API request");

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(json!({ "success": true }));
        }

        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let message = body
                .as_ref()
                .and_then(|b| b.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// ベース URL にパスセグメントを連結する
    ///
    /// 各セグメントはパーセントエンコードされる（`/` は `%2F`）。
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// `api/robots/{id}` のセグメント
///
/// 空文字列と `.` / `..` はパス上で別のリソースを指すため拒否する。
fn robot_segments(id: &str) -> Result<Vec<&str>> {
    if matches!(id, "" | "." | "..") {
        return Err(ClientError::InvalidRobotId(id.to_string()));
    }
    Ok(vec!["api", "robots", id])
}
