//! Station directory error types.

use crate::domain::DomainError;

/// Errors that can occur when fetching or parsing the station list.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page returned an error status
    #[error("page returned status {status}")]
    Status { status: u16 },

    /// The page does not contain the expected table
    #[error("page structure error: {message}")]
    Structure { message: String },

    /// A table row could not be turned into a station
    #[error("invalid row: {0}")]
    Row(#[from] DomainError),

    /// A cell held something other than what its column expects
    #[error("invalid {column} cell: {value:?}")]
    Cell { column: &'static str, value: String },
}
