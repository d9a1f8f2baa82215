//! 設定ファイル発見ロジック
//!
//! robofleet.kdl を自動的に発見する。
//! 環境変数 → 上方向探索 → グローバル設定の順。

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 設定ファイル名
pub const CONFIG_FILENAME: &str = "robofleet.kdl";

/// 設定ファイルパスの環境変数
pub const CONFIG_PATH_ENV: &str = "ROBOFLEET_CONFIG";

/// robofleet.kdl を発見する
///
/// 検索順序:
/// 1. ROBOFLEET_CONFIG 環境変数
/// 2. カレントディレクトリから上方向探索
/// 3. ~/.config/robofleet/robofleet.kdl
///
/// 設定ファイルは必須ではないため、見つからない場合は None を返す。
#[tracing::instrument]
pub fn find_config() -> Option<PathBuf> {
    // 1. 環境変数
    if let Ok(path_str) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path_str);
        debug!(env_path = %path_str, "Checking ROBOFLEET_CONFIG");
        if path.exists() {
            info!(config_path = %path.display(), "Found config from environment variable");
            return Some(path);
        }
        warn!(env_path = %path_str, "ROBOFLEET_CONFIG is set but file does not exist");
    }

    // 2. カレントディレクトリから上に向かって探す
    if let Ok(start_dir) = std::env::current_dir()
        && let Some(path) = find_config_from(&start_dir)
    {
        return Some(path);
    }

    // 3. グローバル設定
    let global = global_config_path()?;
    if global.exists() {
        info!(config_path = %global.display(), "Found global config");
        return Some(global);
    }

    debug!("Config file not found, using defaults");
    None
}

/// 指定ディレクトリから上方向に robofleet.kdl を探す
pub fn find_config_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    debug!(start_dir = %start_dir.display(), "Searching for {}", CONFIG_FILENAME);

    loop {
        let config_file = current.join(CONFIG_FILENAME);
        if config_file.exists() {
            info!(config_path = %config_file.display(), "Found config file");
            return Some(config_file);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// ~/.config/robofleet/robofleet.kdl
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("robofleet").join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_find_config_from_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join(CONFIG_FILENAME), "server { port 3000 }").unwrap();

        let result = find_config_from(root);
        assert!(result.is_some());
        assert!(result.unwrap().ends_with(CONFIG_FILENAME));
    }

    #[test]
    fn test_find_config_from_subdirectory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();

        std::fs::write(root.join(CONFIG_FILENAME), "server { port 3000 }").unwrap();

        // サブディレクトリから探索
        let sub_dir = root.join("deploy").join("demo");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let result = find_config_from(&sub_dir);
        assert_eq!(result, Some(root.join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_find_config_from_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        // 一時ディレクトリの祖先に robofleet.kdl が無い前提
        let result = find_config_from(temp_dir.path());
        assert!(result.is_none());
    }

    #[test]
    #[serial]
    fn test_find_config_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.kdl");
        std::fs::write(&config_path, "// custom").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(config_path.as_os_str()), || {
            assert_eq!(find_config(), Some(config_path.clone()));
        });
    }

    #[test]
    fn test_global_config_path() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("robofleet/robofleet.kdl"));
        }
    }
}
