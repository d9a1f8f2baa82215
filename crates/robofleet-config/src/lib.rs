//! RoboFleet 設定管理
//!
//! robofleet.kdl を発見・パースし、環境変数による上書きを適用する。
//! 設定ファイルが無い場合はデフォルト値で動作する。

pub mod discovery;
pub mod error;
pub mod model;
pub mod parser;

pub use discovery::*;
pub use error::*;
pub use model::*;
pub use parser::*;

use std::path::PathBuf;
use tracing::info;

/// 設定をロードする
///
/// 1. robofleet.kdl を発見してパース（見つからなければデフォルト）
/// 2. 環境変数による上書きを適用
///
/// 読み込んだファイルのパスも返す。
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let path = find_config();

    let mut config = match &path {
        Some(path) => {
            let config = parse_config_file(path)?;
            info!(config_path = %path.display(), "Loaded config");
            config
        }
        None => Config::default(),
    };

    config.apply_env_overrides()?;
    Ok((config, path))
}
