//! Streamable HTTP トランスポート
//!
//! `POST /mcp` でステートレスな MCP リクエストを受け付ける。
//! 1リクエストごとに JSON-RPC のレスポンスを `application/json` で返す。

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::never::NeverSessionManager,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::{RoboFleetServer, RobotApiClient};

/// MCP エンドポイントのパス
pub const MCP_PATH: &str = "/mcp";

/// ヘルスチェックに含めるサーバー名
pub const SERVER_NAME: &str = "robofleet-mcp";

/// `GET /health` のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub server: String,
}

/// 未定義ルートのレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotFoundResponse {
    pub error: String,
}

/// HTTP トランスポートのルーターを構築する
///
/// `check_host` が false の場合、Host ヘッダーの検証を行わない。
pub fn build_http_app(server: RoboFleetServer, check_host: bool) -> Router {
    let mut config = StreamableHttpServerConfig::default()
        .with_stateful_mode(false)
        .with_json_response(true)
        .with_sse_keep_alive(None);
    if !check_host {
        config = config.disable_allowed_hosts();
    }

    let mcp = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(NeverSessionManager::default()),
        config,
    );

    Router::new()
        .route("/health", get(health))
        .nest_service(MCP_PATH, mcp)
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        server: SERVER_NAME.to_string(),
    })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Not found".to_string(),
        }),
    )
}

/// ループバックアドレスかどうか
fn is_loopback_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
}

/// MCP サーバーを起動（Streamable HTTP トランスポート）
///
/// Ctrl+C で停止する。
pub async fn run_http_server(api_url: &str, host: &str, port: u16) -> anyhow::Result<()> {
    let server = RoboFleetServer::new(RobotApiClient::new(api_url));
    let check_host = is_loopback_host(host);
    if !check_host {
        warn!(%host, "Host header validation disabled for non-loopback bind");
    }
    let app = build_http_app(server, check_host);

    let address = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("{} にバインドできません", address))?;

    info!(
        address = %listener.local_addr()?,
        %api_url,
        path = MCP_PATH,
        "MCP HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("MCP HTTP サーバーが異常終了しました")?;

    info!("MCP HTTP server stopped");
    Ok(())
}

/// Start HTTP transport in background (for testing)
pub async fn start_background_http_server(
    api_url: &str,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let server = RoboFleetServer::new(RobotApiClient::new(api_url));
    let app = build_http_app(server, is_loopback_host(host));

    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "MCP HTTP server error");
        }
    });

    Ok(actual_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_loopback_host() {
        assert!(is_loopback_host("127.0.0.1"));
        assert!(is_loopback_host("localhost"));
        assert!(!is_loopback_host("0.0.0.0"));
    }
}
