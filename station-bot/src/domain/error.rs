//! Domain error types.
//!
//! These errors represent validation failures while building station
//! records. They are distinct from network and storage errors.

/// Domain-level errors for station validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A required text field was empty or whitespace only
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    /// A stop type column contained something other than its marker letter
    #[error("invalid value for {column} column: {value:?}")]
    InvalidStopMarker { column: char, value: String },
}
