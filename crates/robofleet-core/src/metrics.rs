//! フリートメトリクスの集計

use crate::model::{Robot, RobotStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `GET /api/metrics` のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetMetrics {
    pub fleet: FleetSummary,
    pub operational: OperationalMetrics,
    pub timestamp: DateTime<Utc>,
}

/// 台数と内訳
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_location: BTreeMap<String, usize>,
}

/// 稼働率（整数に四捨五入したパーセンテージ）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalMetrics {
    pub active_percentage: u32,
    pub maintenance_percentage: u32,
    pub offline_percentage: u32,
}

impl FleetMetrics {
    pub fn from_robots(robots: &[Robot]) -> Self {
        let mut fleet = FleetSummary {
            total: robots.len(),
            ..Default::default()
        };

        for robot in robots {
            *fleet
                .by_status
                .entry(robot.status.as_str().to_string())
                .or_default() += 1;
            *fleet.by_type.entry(robot.robot_type.clone()).or_default() += 1;
            *fleet.by_location.entry(robot.location.clone()).or_default() += 1;
        }

        let operational = OperationalMetrics {
            active_percentage: fleet.percentage_of(RobotStatus::Active),
            maintenance_percentage: fleet.percentage_of(RobotStatus::Maintenance),
            offline_percentage: fleet.percentage_of(RobotStatus::Offline),
        };

        Self {
            fleet,
            operational,
            timestamp: Utc::now(),
        }
    }
}

impl FleetSummary {
    pub fn count_of(&self, status: RobotStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }

    /// 空のフリートでは 0
    pub fn percentage_of(&self, status: RobotStatus) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let ratio = self.count_of(status) as f64 / self.total as f64;
        (ratio * 100.0).round() as u32
    }
}
