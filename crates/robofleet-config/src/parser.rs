//! robofleet.kdl パーサー
//!
//! KDL構文をパースして Config 構造体を生成する。

use crate::error::{ConfigError, Result};
use crate::model::{Config, McpConfig, ServerConfig};
use chrono::{DateTime, Utc};
use kdl::{KdlDocument, KdlNode};
use robofleet_core::{DEFAULT_LOCATION, INITIAL_BATTERY_LEVEL, Robot, RobotStatus};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// KDLファイルを Config にパース
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// KDL文字列を Config にパース
pub fn parse_config(content: &str) -> Result<Config> {
    let doc: KdlDocument = content.parse()?;

    let mut config = Config::default();
    let mut robots: Option<Vec<Robot>> = None;
    let mut seen_ids = HashSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "server" => {
                config.server = parse_server(node)?;
            }
            "mcp" => {
                config.mcp = parse_mcp(node)?;
            }
            "robot" => {
                let robot = parse_robot(node)?;
                if !seen_ids.insert(robot.id.clone()) {
                    return Err(ConfigError::DuplicateRobot(robot.id));
                }
                robots.get_or_insert_with(Vec::new).push(robot);
            }
            _ => {
                // 不明なノードはスキップ
            }
        }
    }

    config.robots = robots;
    Ok(config)
}

/// server ノードをパース
fn parse_server(node: &KdlNode) -> Result<ServerConfig> {
    let mut server = ServerConfig::default();

    let Some(children) = node.children() else {
        return Ok(server);
    };

    for child in children.nodes() {
        match child.name().value() {
            "host" => {
                if let Some(host) = first_string(child) {
                    server.host = host.to_string();
                }
            }
            "port" => {
                let port = first_integer(child)
                    .ok_or_else(|| invalid("server.port には整数が必要です"))?;
                server.port = u16::try_from(port)
                    .map_err(|_| invalid(format!("server.port が範囲外です: {}", port)))?;
            }
            "environment" => {
                if let Some(env) = first_string(child) {
                    server.environment = env.parse()?;
                }
            }
            "cors" => {
                if let Some(cors) = child.entries().first().and_then(|e| e.value().as_bool()) {
                    server.cors = cors;
                }
            }
            "static-dir" => {
                server.static_dir = first_string(child).map(PathBuf::from);
            }
            _ => {}
        }
    }

    Ok(server)
}

/// mcp ノードをパース
fn parse_mcp(node: &KdlNode) -> Result<McpConfig> {
    let mut mcp = McpConfig::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "api-url" => {
                    if let Some(url) = first_string(child) {
                        mcp.api_url = url.trim_end_matches('/').to_string();
                    }
                }
                "host" => {
                    if let Some(host) = first_string(child) {
                        mcp.host = host.to_string();
                    }
                }
                "port" => {
                    let port = first_integer(child)
                        .ok_or_else(|| invalid("mcp.port には整数が必要です"))?;
                    mcp.port = u16::try_from(port)
                        .map_err(|_| invalid(format!("mcp.port が範囲外です: {}", port)))?;
                }
                _ => {}
            }
        }
    }

    Ok(mcp)
}

/// robot ノードをパース
fn parse_robot(node: &KdlNode) -> Result<Robot> {
    let id = first_string(node)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| invalid("robot には ID が必要です"))?
        .to_string();

    let mut name = None;
    let mut robot_type = None;
    let mut status = RobotStatus::Inactive;
    let mut location = DEFAULT_LOCATION.to_string();
    let mut battery_level = INITIAL_BATTERY_LEVEL;
    let mut last_maintenance = None;
    let mut created_at = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "name" => name = first_string(child).map(|s| s.to_string()),
                "type" => robot_type = first_string(child).map(|s| s.to_string()),
                "status" => {
                    if let Some(value) = first_string(child) {
                        status = value.parse().map_err(|_| {
                            invalid(format!("robot '{}' の status が不正です: {}", id, value))
                        })?;
                    }
                }
                "location" => {
                    if let Some(value) = first_string(child) {
                        location = value.to_string();
                    }
                }
                "battery-level" => {
                    let value = first_integer(child).ok_or_else(|| {
                        invalid(format!("robot '{}' の battery-level には整数が必要です", id))
                    })?;
                    battery_level = i64::try_from(value).map_err(|_| {
                        invalid(format!("robot '{}' の battery-level が範囲外です", id))
                    })?;
                }
                "last-maintenance" => {
                    last_maintenance = first_string(child)
                        .map(|value| parse_timestamp(&id, "last-maintenance", value))
                        .transpose()?;
                }
                "created-at" => {
                    created_at = first_string(child)
                        .map(|value| parse_timestamp(&id, "created-at", value))
                        .transpose()?;
                }
                _ => {}
            }
        }
    }

    let name = name.ok_or_else(|| invalid(format!("robot '{}' に name が必要です", id)))?;
    let robot_type =
        robot_type.ok_or_else(|| invalid(format!("robot '{}' に type が必要です", id)))?;

    Ok(Robot {
        id,
        name,
        robot_type,
        status,
        location,
        battery_level,
        last_maintenance,
        created_at: created_at.unwrap_or_else(Utc::now),
    })
}

fn parse_timestamp(id: &str, field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| invalid(format!("robot '{}' の {} が不正です: {} ({})", id, field, value, e)))
}

fn first_string(node: &KdlNode) -> Option<&str> {
    node.entries().first().and_then(|e| e.value().as_string())
}

fn first_integer(node: &KdlNode) -> Option<i128> {
    node.entries().first().and_then(|e| e.value().as_integer())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Environment;

    const SAMPLE_CONFIG: &str = r#"
server {
    host "127.0.0.1"
    port 8080
    environment "production"
    cors #false
    static-dir "public"
}

mcp {
    api-url "http://robot-api:8080/"
    port 4001
}

robot "rb-100" {
    name "Line Runner"
    type "logistics"
    status "active"
    location "warehouse-2"
    battery-level 64
    last-maintenance "2024-02-01T08:00:00Z"
    created-at "2023-11-01T09:30:00Z"
}

robot "rb-101" {
    name "Spare Arm"
    type "assembly"
}
"#;

    #[test]
    fn test_parse_config_full() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Production);
        assert!(!config.server.cors);
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.mcp.api_url, "http://robot-api:8080");
        assert_eq!(config.mcp.port, 4001);
        assert_eq!(config.mcp.host, "0.0.0.0");

        let robots = config.robots.as_ref().unwrap();
        assert_eq!(robots.len(), 2);

        let runner = &robots[0];
        assert_eq!(runner.id, "rb-100");
        assert_eq!(runner.robot_type, "logistics");
        assert_eq!(runner.status, RobotStatus::Active);
        assert_eq!(runner.battery_level, 64);
        assert_eq!(
            runner.created_at,
            "2023-11-01T09:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(runner.last_maintenance.is_some());
    }

    #[test]
    fn test_parse_robot_defaults() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        let spare = &config.robots.unwrap()[1];

        assert_eq!(spare.status, RobotStatus::Inactive);
        assert_eq!(spare.location, DEFAULT_LOCATION);
        assert_eq!(spare.battery_level, INITIAL_BATTERY_LEVEL);
        assert!(spare.last_maintenance.is_none());
    }

    #[test]
    fn test_parse_config_empty_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.seed_robots().len(), 5);
    }

    #[test]
    fn test_parse_config_server_only_keeps_default_fleet() {
        let config = parse_config("server {\n    port 4000\n}\n").unwrap();
        assert_eq!(config.server.port, 4000);
        assert!(config.robots.is_none());
    }

    #[test]
    fn test_parse_config_duplicate_robot() {
        let kdl = r#"
robot "rb-001" {
    name "A"
    type "assembly"
}
robot "rb-001" {
    name "B"
    type "welding"
}
"#;
        let err = parse_config(kdl).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRobot(id) if id == "rb-001"));
    }

    #[test]
    fn test_parse_config_unknown_status() {
        let kdl = r#"
robot "rb-001" {
    name "A"
    type "assembly"
    status "broken"
}
"#;
        let err = parse_config(kdl).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_config_missing_type() {
        let kdl = r#"
robot "rb-001" {
    name "A"
}
"#;
        let err = parse_config(kdl).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_config_bad_timestamp() {
        let kdl = r#"
robot "rb-001" {
    name "A"
    type "assembly"
    created-at "yesterday"
}
"#;
        let err = parse_config(kdl).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_config_port_out_of_range() {
        let err = parse_config("server {\n    port 70000\n}\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_config_mcp_port_out_of_range() {
        let err = parse_config("mcp {\n    port 65536\n}\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn test_parse_config_syntax_error() {
        let err = parse_config("server {").unwrap_err();
        assert!(matches!(err, ConfigError::KdlParse(_)));
    }

    #[test]
    fn test_parse_config_file_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = parse_config_file(&temp_dir.path().join("missing.kdl")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
