//! Fleet Registry エラー型

/// Fleet Registry のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Robot '{0}' が見つかりません")]
    NotFound(String),

    #[error("入力が不正です: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
