use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("KDL パースエラー: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("設定ファイルを読み込めません: {path}\n理由: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("不正な設定: {0}")]
    InvalidConfig(String),

    #[error("robot '{0}' が重複して定義されています")]
    DuplicateRobot(String),

    #[error("環境変数 {name} の値が不正です: {value}")]
    InvalidEnvVar { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
