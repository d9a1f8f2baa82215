//! Fleet Registry データモデル

use crate::error::{RegistryError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// location 未指定で作成されたロボットの配置先
pub const DEFAULT_LOCATION: &str = "unassigned";

/// 作成直後のバッテリー残量
pub const INITIAL_BATTERY_LEVEL: i64 = 100;

/// type 未指定時のメンテナンス種別
pub const DEFAULT_MAINTENANCE_TYPE: &str = "routine";

/// メンテナンスの見積もり所要時間（固定値）
pub const ESTIMATED_MAINTENANCE_DURATION: &str = "2 hours";

/// ロボットレコード
///
/// `id` と `created_at` は作成後に変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    /// `rb-` で始まる一意な識別子
    pub id: String,

    /// 表示名
    pub name: String,

    /// 種別（assembly, welding など自由形式）
    #[serde(rename = "type")]
    pub robot_type: String,

    /// 稼働状態
    pub status: RobotStatus,

    /// 配置先
    pub location: String,

    /// バッテリー残量（0-100 を想定するが更新時に検証はしない）
    pub battery_level: i64,

    /// 最終メンテナンス日時
    pub last_maintenance: Option<DateTime<Utc>>,

    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl Robot {
    /// 作成リクエストから新しいロボットを組み立てる
    pub fn from_new(id: String, new: NewRobot, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            robot_type: new.robot_type,
            status: RobotStatus::Inactive,
            location: new
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            battery_level: INITIAL_BATTERY_LEVEL,
            last_maintenance: None,
            created_at,
        }
    }
}

/// ロボットの稼働状態
///
/// 遷移制約はなく、Update で任意の状態に変更できる。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Active,
    #[default]
    Inactive,
    Maintenance,
    Offline,
}

impl RobotStatus {
    pub const ALL: [RobotStatus; 4] = [
        RobotStatus::Active,
        RobotStatus::Inactive,
        RobotStatus::Maintenance,
        RobotStatus::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Active => "active",
            RobotStatus::Inactive => "inactive",
            RobotStatus::Maintenance => "maintenance",
            RobotStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        RobotStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                RegistryError::Validation(format!(
                    "unknown status '{}' (expected one of: active, inactive, maintenance, offline)",
                    s
                ))
            })
    }
}

/// ロボット作成の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRobot {
    pub name: String,
    pub robot_type: String,
    pub location: Option<String>,
}

impl NewRobot {
    pub fn new(name: impl Into<String>, robot_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            robot_type: robot_type.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// 未検証の入力から組み立てる
    ///
    /// name と type はどちらも空でない文字列が必須。
    pub fn from_parts(
        name: Option<String>,
        robot_type: Option<String>,
        location: Option<String>,
    ) -> Result<Self> {
        match (
            name.filter(|n| !n.is_empty()),
            robot_type.filter(|t| !t.is_empty()),
        ) {
            (Some(name), Some(robot_type)) => Ok(Self {
                name,
                robot_type,
                location,
            }),
            _ => Err(RegistryError::Validation(
                "Name and type are required fields".to_string(),
            )),
        }
    }
}

/// 部分更新
///
/// 変更可能なのはこの4フィールドのみ。`id` や `createdAt` を含む JSON は
/// デシリアライズ時に未知のキーとして捨てられる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RobotStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<i64>,
}

impl RobotPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.battery_level.is_none()
    }

    /// 指定されたフィールドだけをロボットに反映する
    pub fn apply(self, robot: &mut Robot) {
        if let Some(name) = self.name {
            robot.name = name;
        }
        if let Some(status) = self.status {
            robot.status = status;
        }
        if let Some(location) = self.location {
            robot.location = location;
        }
        if let Some(battery_level) = self.battery_level {
            robot.battery_level = battery_level;
        }
    }
}

/// 一覧取得のフィルタ
///
/// 指定されたフィールドすべてに完全一致（大文字小文字を区別）したものだけを返す。
/// 空文字列は未指定として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl RobotFilter {
    pub fn by_status(status: RobotStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            location: None,
        }
    }

    pub fn by_location(location: impl Into<String>) -> Self {
        Self {
            status: None,
            location: Some(location.into()),
        }
    }

    pub fn matches(&self, robot: &Robot) -> bool {
        let status_matches = match self.status.as_deref() {
            Some(status) if !status.is_empty() => robot.status.as_str() == status,
            _ => true,
        };
        let location_matches = match self.location.as_deref() {
            Some(location) if !location.is_empty() => robot.location == location,
            _ => true,
        };
        status_matches && location_matches
    }
}

/// メンテナンス予約の入力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub maintenance_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// メンテナンス予約チケット
///
/// 計算結果のみで、ロボットレコード自体は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTicket {
    pub robot_id: String,
    pub robot_name: String,
    pub maintenance_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub estimated_duration: String,
    pub status: TicketStatus,
}

impl MaintenanceTicket {
    pub fn for_robot(robot: &Robot, request: MaintenanceRequest, now: DateTime<Utc>) -> Self {
        Self {
            robot_id: robot.id.clone(),
            robot_name: robot.name.clone(),
            maintenance_type: request
                .maintenance_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_MAINTENANCE_TYPE.to_string()),
            scheduled_date: request.scheduled_date.unwrap_or(now),
            estimated_duration: ESTIMATED_MAINTENANCE_DURATION.to_string(),
            status: TicketStatus::Scheduled,
        }
    }
}

/// チケットの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Scheduled,
}
