//! デモ用の初期フリート

use crate::model::{Robot, RobotStatus};
use chrono::{DateTime, Utc};

/// 設定ファイルで robot が定義されていない場合に投入される5台
pub fn default_robots() -> Vec<Robot> {
    vec![
        seed(
            "rb-001",
            "Atlas Prime",
            "assembly",
            RobotStatus::Active,
            "factory-floor-a",
            87,
            "2024-01-10T14:30:00Z",
            "2023-06-15T09:00:00Z",
        ),
        seed(
            "rb-002",
            "Welder X7",
            "welding",
            RobotStatus::Active,
            "factory-floor-b",
            92,
            "2024-01-12T10:00:00Z",
            "2023-07-20T11:30:00Z",
        ),
        seed(
            "rb-003",
            "Inspector Bot",
            "quality-control",
            RobotStatus::Maintenance,
            "maintenance-bay",
            45,
            "2024-01-18T08:00:00Z",
            "2023-08-05T14:00:00Z",
        ),
        seed(
            "rb-004",
            "Cargo Hauler",
            "logistics",
            RobotStatus::Active,
            "warehouse-1",
            78,
            "2024-01-08T16:00:00Z",
            "2023-05-10T08:00:00Z",
        ),
        seed(
            "rb-005",
            "Precision Arm",
            "assembly",
            RobotStatus::Offline,
            "factory-floor-a",
            12,
            "2023-12-20T12:00:00Z",
            "2023-04-01T10:00:00Z",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    name: &str,
    robot_type: &str,
    status: RobotStatus,
    location: &str,
    battery_level: i64,
    last_maintenance: &str,
    created_at: &str,
) -> Robot {
    Robot {
        id: id.to_string(),
        name: name.to_string(),
        robot_type: robot_type.to_string(),
        status,
        location: location.to_string(),
        battery_level,
        last_maintenance: Some(timestamp(last_maintenance)),
        created_at: timestamp(created_at),
    }
}

// 定数のみを渡すため失敗しない
fn timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_robots_have_unique_ids() {
        let robots = default_robots();
        assert_eq!(robots.len(), 5);

        let ids: HashSet<_> = robots.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), robots.len());
    }

    #[test]
    fn test_default_robot_timestamps() {
        let robots = default_robots();
        let atlas = &robots[0];
        assert_eq!(atlas.created_at.to_rfc3339(), "2023-06-15T09:00:00+00:00");
        assert_eq!(
            atlas.last_maintenance.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-01-10T14:30:00+00:00")
        );
    }
}
