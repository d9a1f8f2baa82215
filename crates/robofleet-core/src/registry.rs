//! ロボットコレクションを所有する Fleet Registry
//!
//! コレクションは単一の `RwLock` で保護され、各操作はロックを一度だけ取得して
//! 完了するまで保持する。並行リクエストからの書き込みはこのロックで直列化される。

use crate::error::{RegistryError, Result};
use crate::metrics::FleetMetrics;
use crate::model::{
    MaintenanceRequest, MaintenanceTicket, NewRobot, Robot, RobotFilter, RobotPatch,
};
use crate::seed::default_robots;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// 生成IDのプレフィックス
const ID_PREFIX: &str = "rb-";

/// UUID から切り出す桁数
const ID_TOKEN_LEN: usize = 8;

/// Fleet Registry
#[derive(Debug, Default)]
pub struct RobotRegistry {
    robots: RwLock<Vec<Robot>>,
}

impl RobotRegistry {
    /// 空のレジストリ
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定したロボットを挿入順に保持するレジストリ
    pub fn with_robots(robots: Vec<Robot>) -> Self {
        Self {
            robots: RwLock::new(robots),
        }
    }

    /// デモ用の5台を投入したレジストリ
    pub fn seeded() -> Self {
        Self::with_robots(default_robots())
    }

    /// フィルタに一致するロボットのスナップショットを返す
    pub async fn list(&self, filter: &RobotFilter) -> Vec<Robot> {
        self.robots
            .read()
            .await
            .iter()
            .filter(|robot| filter.matches(robot))
            .cloned()
            .collect()
    }

    /// ID で1台取得する
    pub async fn get(&self, id: &str) -> Result<Robot> {
        let robots = self.robots.read().await;
        robots.iter().find(|r| r.id == id).cloned().ok_or_else(|| {
            debug!(robot_id = %id, "Robot not found");
            RegistryError::NotFound(id.to_string())
        })
    }

    /// ロボットを作成してコレクション末尾に追加する
    ///
    /// name/type の検証は呼び出し側（[`NewRobot::from_parts`]）の責務。
    pub async fn create(&self, new: NewRobot) -> Robot {
        let mut robots = self.robots.write().await;

        let id = loop {
            let candidate = generate_id();
            if !robots.iter().any(|r| r.id == candidate) {
                break candidate;
            }
        };

        let robot = Robot::from_new(id, new, Utc::now());
        robots.push(robot.clone());

        info!(robot_id = %robot.id, name = %robot.name, "Robot created");
        robot
    }

    /// 許可された4フィールドのみを更新する
    pub async fn update(&self, id: &str, patch: RobotPatch) -> Result<Robot> {
        let mut robots = self.robots.write().await;
        let robot = robots
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        patch.apply(robot);

        info!(robot_id = %id, status = %robot.status, "Robot updated");
        Ok(robot.clone())
    }

    /// ロボットを削除する。存在しない場合は false（エラーではない）
    pub async fn delete(&self, id: &str) -> bool {
        let mut robots = self.robots.write().await;
        match robots.iter().position(|r| r.id == id) {
            Some(index) => {
                robots.remove(index);
                info!(robot_id = %id, "Robot deleted");
                true
            }
            None => {
                debug!(robot_id = %id, "Delete requested for unknown robot");
                false
            }
        }
    }

    /// メンテナンス予約チケットを計算する
    ///
    /// ロボットの `last_maintenance` や `status` は変更しない。
    pub async fn schedule_maintenance(
        &self,
        id: &str,
        request: MaintenanceRequest,
    ) -> Result<MaintenanceTicket> {
        let robot = self.get(id).await?;
        let ticket = MaintenanceTicket::for_robot(&robot, request, Utc::now());

        info!(
            robot_id = %id,
            maintenance_type = %ticket.maintenance_type,
            scheduled_date = %ticket.scheduled_date,
            "Maintenance scheduled"
        );
        Ok(ticket)
    }

    /// 現在のフリート全体から集計したメトリクス
    pub async fn metrics(&self) -> FleetMetrics {
        let robots = self.list(&RobotFilter::default()).await;
        FleetMetrics::from_robots(&robots)
    }

    pub async fn len(&self) -> usize {
        self.robots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.robots.read().await.is_empty()
    }
}

fn generate_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}{}", ID_PREFIX, &token[..ID_TOKEN_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_LOCATION, RobotStatus};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_without_filter_returns_all_in_insertion_order() {
        let registry = RobotRegistry::seeded();
        let robots = registry.list(&RobotFilter::default()).await;

        let ids: Vec<_> = robots.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["rb-001", "rb-002", "rb-003", "rb-004", "rb-005"]);
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let registry = RobotRegistry::seeded();
        let robots = registry
            .list(&RobotFilter::by_status(RobotStatus::Active))
            .await;

        assert_eq!(robots.len(), 3);
        assert!(robots.iter().all(|r| r.status == RobotStatus::Active));
    }

    #[tokio::test]
    async fn test_list_by_status_and_location() {
        let registry = RobotRegistry::seeded();
        let filter = RobotFilter {
            status: Some("offline".to_string()),
            location: Some("factory-floor-a".to_string()),
        };
        let robots = registry.list(&filter).await;

        assert_eq!(robots.len(), 1);
        assert_eq!(robots[0].id, "rb-005");
    }

    #[tokio::test]
    async fn test_list_returns_snapshot() {
        let registry = RobotRegistry::seeded();
        let snapshot = registry.list(&RobotFilter::default()).await;

        registry.delete("rb-001").await;
        registry
            .update(
                "rb-002",
                RobotPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[1].name, "Welder X7");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let registry = RobotRegistry::seeded();
        let err = registry.get("rb-999").await.unwrap_err();
        assert_eq!(err, RegistryError::NotFound("rb-999".to_string()));
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let registry = RobotRegistry::seeded();
        let existing: Vec<_> = registry
            .list(&RobotFilter::default())
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();

        let robot = registry.create(NewRobot::new("Test Bot", "testing")).await;

        assert!(robot.id.starts_with(ID_PREFIX));
        assert_eq!(robot.id.len(), ID_PREFIX.len() + ID_TOKEN_LEN);
        assert!(!existing.contains(&robot.id));
        assert_eq!(robot.status, RobotStatus::Inactive);
        assert_eq!(robot.battery_level, 100);
        assert!(robot.last_maintenance.is_none());
        assert_eq!(robot.location, DEFAULT_LOCATION);

        assert_eq!(registry.len().await, 6);
        assert_eq!(registry.get(&robot.id).await.unwrap(), robot);
    }

    #[tokio::test]
    async fn test_create_with_location() {
        let registry = RobotRegistry::new();
        let robot = registry
            .create(NewRobot::new("Bot", "testing").with_location("test-lab"))
            .await;
        assert_eq!(robot.location, "test-lab");
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let registry = RobotRegistry::new();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let robot = registry
                .create(NewRobot::new(format!("Bot {}", i), "testing"))
                .await;
            assert!(ids.insert(robot.id));
        }
    }

    #[tokio::test]
    async fn test_update_status_only() {
        let registry = RobotRegistry::seeded();
        let before = registry.get("rb-001").await.unwrap();

        let updated = registry
            .update(
                "rb-001",
                RobotPatch {
                    status: Some(RobotStatus::Maintenance),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, RobotStatus::Maintenance);
        assert_eq!(updated.name, before.name);
        assert_eq!(updated.location, before.location);
        assert_eq!(updated.battery_level, before.battery_level);
        assert_eq!(registry.get("rb-001").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_ignores_id_and_created_at() {
        let registry = RobotRegistry::seeded();
        let before = registry.get("rb-002").await.unwrap();

        let patch: RobotPatch =
            serde_json::from_value(json!({ "id": "x", "createdAt": "y" })).unwrap();
        let updated = registry.update("rb-002", patch).await.unwrap();

        assert_eq!(updated.id, "rb-002");
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated, before);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let registry = RobotRegistry::seeded();
        let result = registry.update("rb-999", RobotPatch::default()).await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let registry = RobotRegistry::seeded();

        assert!(registry.delete("rb-005").await);
        assert!(registry.get("rb-005").await.is_err());

        let robots = registry.list(&RobotFilter::default()).await;
        assert_eq!(robots.len(), 4);
        assert!(robots.iter().all(|r| r.id != "rb-005"));
    }

    #[tokio::test]
    async fn test_delete_unknown_returns_false() {
        let registry = RobotRegistry::seeded();
        assert!(!registry.delete("rb-999").await);
        assert_eq!(registry.len().await, 5);
    }

    #[tokio::test]
    async fn test_schedule_maintenance_does_not_mutate_robot() {
        let registry = RobotRegistry::seeded();
        let before = registry.get("rb-004").await.unwrap();

        let scheduled_date = "2024-03-01T09:00:00Z".parse().unwrap();
        let ticket = registry
            .schedule_maintenance(
                "rb-004",
                MaintenanceRequest {
                    maintenance_type: Some("repair".to_string()),
                    scheduled_date: Some(scheduled_date),
                },
            )
            .await
            .unwrap();

        assert_eq!(ticket.robot_id, "rb-004");
        assert_eq!(ticket.robot_name, "Cargo Hauler");
        assert_eq!(ticket.maintenance_type, "repair");
        assert_eq!(ticket.scheduled_date, scheduled_date);
        assert_eq!(registry.get("rb-004").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_schedule_maintenance_unknown_mutates_nothing() {
        let registry = RobotRegistry::seeded();
        let before = registry.list(&RobotFilter::default()).await;

        let result = registry
            .schedule_maintenance("rb-999", MaintenanceRequest::default())
            .await;

        assert!(matches!(result, Err(RegistryError::NotFound(_))));
        assert_eq!(registry.list(&RobotFilter::default()).await, before);
    }

    #[tokio::test]
    async fn test_metrics_over_seeded_fleet() {
        let registry = RobotRegistry::seeded();
        let metrics = registry.metrics().await;
        assert_eq!(metrics.fleet.total, 5);
        assert_eq!(metrics.operational.active_percentage, 60);
    }
}
