//! Domain types for the station tracker.
//!
//! A [`Station`] is an immutable record scraped from the station
//! directory. Required fields are validated at construction time.

mod error;
mod station;

pub use error::DomainError;
pub use station::{Route, Station, StationType, StopType};
