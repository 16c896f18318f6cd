use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no style document given (use --style or set style_path)")]
    MissingStylePath,
    #[error("invalid style path: {0}")]
    InvalidStylePath(PathBuf),
    #[error("layer not found: {0}")]
    NotFound(String),
    #[error("invalid style document: {0}")]
    InvalidDocument(String),
    #[error("duplicate layer id: {0}")]
    DuplicateLayerId(String),
    #[error("invalid backup path (matches style document): {0}")]
    InvalidBackupPath(PathBuf),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Json,
    MissingStylePath,
    InvalidStylePath,
    NotFound,
    InvalidDocument,
    DuplicateLayerId,
    InvalidBackupPath,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Json(_) => StoreErrorKind::Json,
            StoreError::MissingStylePath => StoreErrorKind::MissingStylePath,
            StoreError::InvalidStylePath(_) => StoreErrorKind::InvalidStylePath,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::InvalidDocument(_) => StoreErrorKind::InvalidDocument,
            StoreError::DuplicateLayerId(_) => StoreErrorKind::DuplicateLayerId,
            StoreError::InvalidBackupPath(_) => StoreErrorKind::InvalidBackupPath,
        }
    }
}
