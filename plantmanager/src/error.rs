//! Error types for plantmanager
//!
//! All errors use thiserror for structured error handling.

use crate::locale::Strings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed plant entry '{id}': {source}")]
    MalformedPlant {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("{0}")]
    Generic(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of one step of the delete flow.
///
/// Steps run in order (read, look up, cancel notification, write) and the
/// first failure aborts the rest. Nothing is rolled back.
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Failed to read plants record: {0}")]
    Read(#[source] AppError),

    #[error("Plant not found: {0}")]
    NotFound(String),

    #[error("Failed to cancel notification for plant {id}: {source}")]
    CancelNotification {
        id: String,
        #[source]
        source: AppError,
    },

    /// The notification was cancelled but the record still holds the entry.
    #[error("Failed to write plants record after removing {id}: {source}")]
    Write {
        id: String,
        #[source]
        source: AppError,
    },
}

impl DeleteError {
    /// Whether the plant's reminder is gone even though the delete failed
    pub fn notification_cancelled(&self) -> bool {
        matches!(self, DeleteError::Write { .. })
    }

    /// Text shown to the user in the alert popup
    pub fn alert_message(&self, strings: &Strings) -> String {
        if self.notification_cancelled() {
            format!("{} {}", strings.remove_failed, strings.reminder_already_cancelled)
        } else {
            strings.remove_failed.to_string()
        }
    }
}
