//! API server state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use robofleet_config::Environment;
use robofleet_core::RobotRegistry;

/// サービス識別子（ヘルスチェックに含める）
pub const SERVICE_NAME: &str = "robofleet-api";

/// Shared state for the API server.
#[derive(Clone)]
pub struct AppState {
    /// Fleet Registry
    pub registry: Arc<RobotRegistry>,
    /// 実行環境
    pub environment: Environment,
    /// サーバーのバージョン
    pub version: String,
    started_at: Instant,
}

impl AppState {
    pub fn new(registry: Arc<RobotRegistry>, environment: Environment) -> Self {
        Self {
            registry,
            environment,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        }
    }

    /// サーバー起動からの経過時間
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
