//! 設定データモデル

use crate::error::{ConfigError, Result};
use robofleet_core::{Robot, default_robots};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_MCP_PORT: u16 = 3001;

/// RoboFleet 設定（robofleet.kdl）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// HTTP API サーバー設定
    pub server: ServerConfig,

    /// MCP アダプタ設定
    pub mcp: McpConfig,

    /// 初期投入するロボット（None の場合はデモ用の5台）
    pub robots: Option<Vec<Robot>>,
}

impl Config {
    /// レジストリに投入するロボット
    pub fn seed_robots(&self) -> Vec<Robot> {
        match &self.robots {
            Some(robots) => robots.clone(),
            None => default_robots(),
        }
    }

    /// 環境変数による上書きを適用する
    ///
    /// - `PORT`: server.port
    /// - `ROBOFLEET_ENV`: server.environment
    /// - `ROBOT_API_URL`: mcp.api-url
    /// - `MCP_PORT`: mcp.port
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "PORT".to_string(),
                    value: port.clone(),
                })?;
        }

        if let Ok(env) = std::env::var("ROBOFLEET_ENV") {
            self.server.environment =
                env.parse()
                    .map_err(|_| ConfigError::InvalidEnvVar {
                        name: "ROBOFLEET_ENV".to_string(),
                        value: env.clone(),
                    })?;
        }

        if let Ok(url) = std::env::var("ROBOT_API_URL")
            && !url.is_empty()
        {
            self.mcp.api_url = url;
        }

        if let Ok(port) = std::env::var("MCP_PORT") {
            self.mcp.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: "MCP_PORT".to_string(),
                    value: port.clone(),
                })?;
        }

        Ok(())
    }
}

/// HTTP API サーバー設定
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// 全オリジン許可の CORS を有効にするか
    pub cors: bool,
    /// 未定義ルートのフォールバックとして配信する静的ファイルディレクトリ
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            cors: true,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MCP アダプタ設定
#[derive(Debug, Clone, PartialEq)]
pub struct McpConfig {
    /// 転送先 HTTP API のベース URL
    pub api_url: String,
    /// HTTP トランスポートの待ち受けホスト
    pub host: String,
    /// HTTP トランスポートの待ち受けポート
    pub port: u16,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_MCP_PORT,
        }
    }
}

impl McpConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 実行環境
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }

    /// 本番環境では内部エラーの詳細をレスポンスに含めない
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(ConfigError::InvalidConfig(format!(
                "不明な environment: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.server.environment, Environment::Development);
        assert!(config.server.cors);
        assert_eq!(config.mcp.api_url, DEFAULT_API_URL);
        assert_eq!(config.mcp.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.seed_robots().len(), 5);
    }

    #[test]
    fn test_explicit_empty_fleet() {
        let config = Config {
            robots: Some(Vec::new()),
            ..Default::default()
        };
        assert!(config.seed_robots().is_empty());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::Test.is_production());
    }

    #[test]
    #[serial]
    fn test_apply_env_overrides() {
        temp_env::with_vars(
            [
                ("PORT", Some("8080")),
                ("ROBOFLEET_ENV", Some("production")),
                ("ROBOT_API_URL", Some("http://api.internal:8080")),
                ("MCP_PORT", Some("4001")),
            ],
            || {
                let mut config = Config::default();
                config.apply_env_overrides().unwrap();

                assert_eq!(config.server.port, 8080);
                assert_eq!(config.server.environment, Environment::Production);
                assert_eq!(config.mcp.api_url, "http://api.internal:8080");
                assert_eq!(config.mcp.port, 4001);
            },
        );
    }

    #[test]
    #[serial]
    fn test_apply_env_overrides_invalid_port() {
        temp_env::with_vars(
            [
                ("PORT", Some("not-a-port")),
                ("ROBOFLEET_ENV", None),
                ("ROBOT_API_URL", None),
                ("MCP_PORT", None),
            ],
            || {
                let mut config = Config::default();
                let err = config.apply_env_overrides().unwrap_err();
                assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
            },
        );
    }
}
