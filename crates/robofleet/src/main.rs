mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// serve 時のデフォルトログフィルタ
const DEFAULT_LOG_FILTER: &str = "robofleet=info,tower_http=info";

/// MCP モードのログ出力先（stdout は JSON-RPC に使う）
const MCP_LOG_PATH: &str = "/tmp/robofleet-mcp.log";

#[derive(Parser)]
#[command(name = "robofleet")]
#[command(about = "ロボットフリートを、API とエージェントから。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// HTTP API サーバーを起動
    Serve {
        /// 待ち受けホスト（設定ファイルより優先）
        #[arg(long)]
        host: Option<String>,
        /// 待ち受けポート（設定ファイル・PORT 環境変数より優先）
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// MCP (Model Context Protocol) サーバーを起動
    Mcp {
        /// 転送先 API のベース URL
        #[arg(long, env = "ROBOT_API_URL")]
        api_url: Option<String>,
        /// stdio の代わりに Streamable HTTP で待ち受ける
        #[arg(long)]
        http: bool,
        /// HTTP モードの待ち受けホスト
        #[arg(long, requires = "http")]
        host: Option<String>,
        /// HTTP モードの待ち受けポート（設定ファイル・MCP_PORT 環境変数より優先）
        #[arg(short, long, requires = "http")]
        port: Option<u16>,
    },
    /// 設定を検証
    Validate,
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdio モードでは stdout を JSON-RPC 通信に使うので、ログはファイルに出力
    if let Commands::Mcp {
        api_url,
        http: false,
        ..
    } = cli.command
    {
        use std::fs::OpenOptions;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(MCP_LOG_PATH)
            .ok();

        if let Some(file) = log_file {
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
                )
                .with_ansi(false)
                .init();
        }

        return commands::mcp::handle(api_url).await;
    }

    // 通常のCLIコマンドはstderrにログ出力
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve::handle(host, port).await?;
        }
        Commands::Validate => {
            commands::validate::handle()?;
        }
        Commands::Version => {
            println!("robofleet {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Mcp {
            api_url,
            host,
            port,
            ..
        } => {
            commands::mcp::handle_http(api_url, host, port).await?;
        }
    }

    Ok(())
}
