use colored::Colorize;
use robofleet_config::{Config, load_config};

pub fn handle() -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    match load_config() {
        Ok((config, path)) => {
            match path {
                Some(path) => println!("設定ファイル: {}", path.display().to_string().cyan()),
                None => println!(
                    "{}",
                    "設定ファイルが見つかりません。デフォルト設定を使用します".yellow()
                ),
            }
            println!("{}", "✓ 設定は有効です".green().bold());
            println!();
            print_summary(&config);
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_summary(config: &Config) {
    let server = &config.server;

    println!("サマリー:");
    println!("  サーバー: {}", server.bind_address().cyan());
    println!("  環境: {}", server.environment);
    println!("  CORS: {}", if server.cors { "有効" } else { "無効" });
    if let Some(dir) = &server.static_dir {
        println!("  静的ファイル: {}", dir.display());
    }
    println!("  MCP API URL: {}", config.mcp.api_url);

    let robots = config.seed_robots();
    let source = if config.robots.is_some() {
        "設定ファイル"
    } else {
        "デフォルト"
    };
    println!("  ロボット: {}台 ({})", robots.len(), source);
    for robot in &robots {
        println!(
            "    - {} {} ({}, {})",
            robot.id.cyan(),
            robot.name,
            robot.robot_type,
            robot.status
        );
    }
}
