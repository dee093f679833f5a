//! Error types for event extraction, normalization and persistence.

use std::path::PathBuf;

/// Custom error type for event operations
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("No event table found in the document")]
    NoTableFound,
    #[error("Invalid table selector '{0}'")]
    InvalidSelector(String),
    #[error("No events to process")]
    EmptyCollection,
    #[error("Cannot import events from non-existent file: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Event data is empty: {}", .0.display())]
    EmptyData(PathBuf),
    #[error("File {} exceeds the import size limit ({limit} bytes)", path.display())]
    FileTooLarge { path: PathBuf, limit: u64 },
    #[error("Invalid date format: {0}")]
    MalformedDate(String),
    #[error("Hour out of range: {0} (must be 0-23)")]
    InvalidHour(u32),
    #[error("Failed to parse event JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventResult<T> = std::result::Result<T, EventError>;
