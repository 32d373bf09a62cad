//! Station directory: the authoritative list of stations.
//!
//! Scraped from a Wikipedia list page, supplemented by a few stations
//! maintained by hand.

mod client;
mod error;
mod imported;
mod parse;

pub use client::{DEFAULT_WIKI_URL, StationDirectory, WikiClient, WikiClientConfig};
pub use error::DirectoryError;
pub use imported::imported_stations;
pub use parse::parse_stations;
