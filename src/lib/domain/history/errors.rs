//! Error types for send history

use thiserror::Error;

/// Errors that can occur when getting a history record
#[derive(Debug, Error)]
pub enum GetHistoryError {
    /// No record with that identifier
    #[error("Email history with ID '{0}' not found")]
    RecordNotFound(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
