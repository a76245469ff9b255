use thiserror::Error;

/// テンプレート生成時のエラー
#[derive(Debug, Error)]
pub enum TemplateError {
    /// 品質フレームが不足していて信頼できるテンプレートを作れない
    #[error("insufficient quality frames: got {got}, need at least {need}")]
    InsufficientData { got: usize, need: usize },
}

/// ストア操作のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
