use robofleet_config::McpConfig;
use tracing::warn;

/// `mcp` ブロックの設定を読み込む（失敗時はデフォルト）
fn load_mcp_config() -> McpConfig {
    match robofleet_config::load_config() {
        Ok((config, _)) => config.mcp,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using default MCP settings");
            McpConfig::default()
        }
    }
}

/// API の URL を決定して MCP サーバーを起動する
///
/// `--api-url` / `ROBOT_API_URL` → 設定ファイルの `mcp { api-url }` → デフォルトの順。
pub async fn handle(api_url: Option<String>) -> anyhow::Result<()> {
    let api_url = match api_url.filter(|url| !url.is_empty()) {
        Some(url) => url,
        None => load_mcp_config().api_url,
    };

    // rmcp SDK ベースの MCP サーバーを起動（stdio トランスポート）
    robofleet_mcp::run_server(&api_url).await
}

/// Streamable HTTP トランスポートで MCP サーバーを起動する
///
/// ホストとポートはフラグ → 設定ファイル（`MCP_PORT` を含む）→ デフォルトの順。
pub async fn handle_http(
    api_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let config = load_mcp_config();
    let api_url = api_url
        .filter(|url| !url.is_empty())
        .unwrap_or(config.api_url);
    let host = host.unwrap_or(config.host);
    let port = port.unwrap_or(config.port);

    robofleet_mcp::run_http_server(&api_url, &host, port).await
}
