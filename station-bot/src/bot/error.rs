//! Bot error types.

use crate::storage::StorageError;

/// Errors that prevent a command from being answered.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Loading or storing progress failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A reply template failed to render
    #[error("could not render reply: {0}")]
    Render(#[from] askama::Error),
}
