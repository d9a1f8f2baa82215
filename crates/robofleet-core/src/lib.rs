//! Fleet Registry: ロボットフリートのインメモリ管理
//!
//! ロボットレコードの作成・参照・更新・削除、メンテナンス予約チケットの計算、
//! フリート全体のメトリクス集計を提供します。
//!
//! # 概要
//!
//! - **Model**: ロボットレコードと部分更新・フィルタ・チケットの型
//! - **Registry**: 単一ロックで保護されたロボットコレクション
//! - **Metrics**: 一覧結果から導出される集計値
//! - **Seed**: デフォルトで投入されるデモ用フリート

pub mod error;
pub mod metrics;
pub mod model;
pub mod registry;
pub mod seed;

pub use error::*;
pub use metrics::*;
pub use model::*;
pub use registry::*;
pub use seed::*;
