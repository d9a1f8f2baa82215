//! API クライアントのエラー型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// 接続失敗やデコード失敗など、HTTP レベルのエラー
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// API がエラーステータスを返した
    #[error("{message}")]
    Api { status: u16, message: String },

    /// ベース URL がパスを持てない形式
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// パスセグメントにできないロボットID
    #[error("Invalid robot id: {0:?}")]
    InvalidRobotId(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
