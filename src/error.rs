use thiserror::Error;

#[derive(Error, Debug)]
pub enum UndercovError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report not found: {0}")]
    ReportNotFound(String),
}

pub type Result<T> = std::result::Result<T, UndercovError>;
