//! RoboFleet MCP Server
//!
//! 公式 rmcp SDK を使用した MCP サーバー実装。
//! stdio（デフォルト）または Streamable HTTP トランスポートで動作し、
//! RoboFleet HTTP API の各操作をツールとして提供する。
//! ツールはすべて HTTP API へ転送され、レスポンスの JSON を整形して返す。

pub mod client;
pub mod error;
pub mod http;

pub use client::RobotApiClient;
pub use error::ClientError;
pub use http::{build_http_app, run_http_server, start_background_http_server};

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_router,
};
use robofleet_core::{RobotPatch, RobotStatus};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

// ============================================================================
// パラメータ定義
// ============================================================================

/// ロボット一覧のフィルタ
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListRobotsParam {
    /// ステータスで絞り込み（active, inactive, maintenance, offline）
    pub status: Option<RobotStatus>,
    /// ロケーションで絞り込み（例: factory-floor-a）
    pub location: Option<String>,
}

/// ロボットID パラメータ
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RobotIdParam {
    /// ロボットID（例: rb-001）
    pub id: String,
}

/// ロボット作成パラメータ
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateRobotParam {
    /// ロボット名
    pub name: String,
    /// ロボット種別（例: assembly, welding, logistics）
    #[serde(rename = "type")]
    pub robot_type: String,
    /// 初期ロケーション（省略時は unassigned）
    pub location: Option<String>,
}

/// ロボット更新パラメータ
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRobotParam {
    /// 更新対象のロボットID
    pub id: String,
    pub name: Option<String>,
    pub status: Option<RobotStatus>,
    pub location: Option<String>,
    /// バッテリー残量（0-100）
    pub battery_level: Option<i64>,
}

/// メンテナンス予約パラメータ
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMaintenanceParam {
    /// 対象のロボットID
    pub id: String,
    /// メンテナンス種別（省略時は routine）
    #[serde(rename = "type")]
    pub maintenance_type: Option<String>,
    /// 予定日時（ISO 8601、省略時は現在時刻）
    pub scheduled_date: Option<String>,
}

// ============================================================================
// MCP サーバー
// ============================================================================

/// RoboFleet MCP サーバー
#[derive(Clone)]
pub struct RoboFleetServer {
    client: RobotApiClient,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RoboFleetServer {
    pub fn new(client: RobotApiClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// ロボット一覧を取得
    #[tool(
        description = "フリート内のロボット一覧を取得します。status と location で完全一致の絞り込みができます。"
    )]
    pub async fn list_robots(
        &self,
        params: Parameters<ListRobotsParam>,
    ) -> Result<String, String> {
        let ListRobotsParam { status, location } = params.0;
        render(
            self.client
                .list_robots(status.map(|s| s.as_str()), location.as_deref())
                .await,
        )
    }

    /// ロボットを1台取得
    #[tool(description = "ID を指定してロボットの詳細を取得します。")]
    pub async fn get_robot(&self, params: Parameters<RobotIdParam>) -> Result<String, String> {
        render(self.client.get_robot(&params.0.id).await)
    }

    /// ロボットを登録
    #[tool(
        description = "新しいロボットを登録します。status は inactive、batteryLevel は 100 で作成されます。"
    )]
    pub async fn create_robot(
        &self,
        params: Parameters<CreateRobotParam>,
    ) -> Result<String, String> {
        let CreateRobotParam {
            name,
            robot_type,
            location,
        } = params.0;
        render(
            self.client
                .create_robot(&name, &robot_type, location.as_deref())
                .await,
        )
    }

    /// ロボットを更新
    #[tool(
        description = "ロボットの name / status / location / batteryLevel を更新します。指定しなかった項目は変更されません。"
    )]
    pub async fn update_robot(
        &self,
        params: Parameters<UpdateRobotParam>,
    ) -> Result<String, String> {
        let UpdateRobotParam {
            id,
            name,
            status,
            location,
            battery_level,
        } = params.0;
        let patch = RobotPatch {
            name,
            status,
            location,
            battery_level,
        };
        render(self.client.update_robot(&id, &patch).await)
    }

    /// ロボットを削除
    #[tool(description = "ロボットをフリートから削除（退役）します。")]
    pub async fn delete_robot(&self, params: Parameters<RobotIdParam>) -> Result<String, String> {
        render(self.client.delete_robot(&params.0.id).await)
    }

    /// メンテナンスを予約
    #[tool(
        description = "ロボットのメンテナンスを予約し、予約チケットを返します。ロボットの状態自体は変更されません。"
    )]
    pub async fn schedule_maintenance(
        &self,
        params: Parameters<ScheduleMaintenanceParam>,
    ) -> Result<String, String> {
        let ScheduleMaintenanceParam {
            id,
            maintenance_type,
            scheduled_date,
        } = params.0;
        render(
            self.client
                .schedule_maintenance(&id, maintenance_type.as_deref(), scheduled_date.as_deref())
                .await,
        )
    }
}

/// API レスポンスをツールの出力テキストに変換する
fn render(result: error::Result<Value>) -> Result<String, String> {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).map_err(|e| format!("Error: {}", e)),
        Err(e) => {
            error!(error = %e, "Tool call failed");
            Err(format!("Error: {}", e))
        }
    }
}

impl ServerHandler for RoboFleetServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "RoboFleet MCP サーバー。ロボットフリートの登録・更新・メンテナンス予約を行います。",
        )
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_router.list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_context = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_context).await
    }
}

/// MCP サーバーを起動（stdio トランスポート）
pub async fn run_server(api_url: &str) -> Result<()> {
    let server = RoboFleetServer::new(RobotApiClient::new(api_url));
    info!(api_url = %server.client.base_url(), "Starting MCP server");

    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await.map_err(|e| {
        error!("MCP server initialization failed: {}", e);
        anyhow::anyhow!("MCP server initialization failed: {}", e)
    })?;

    // サーバーが終了するまで待機
    service.waiting().await.map_err(|e| {
        error!("MCP server error: {}", e);
        anyhow::anyhow!("MCP server error: {}", e)
    })?;

    Ok(())
}
