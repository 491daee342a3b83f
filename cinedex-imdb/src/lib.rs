//! Movie ingestion source for cinedex.
//!
//! Scrapes a ranked chart page, resolves each title through a
//! [`MetadataProvider`] and writes one JSON record per line.

pub mod chart;
pub mod error;
pub mod fetch;
pub mod omdb;
pub mod provider;

pub use chart::{ChartEntry, parse_chart, title_id};
pub use error::{ImdbError, Result};
pub use fetch::{ChartSource, DEFAULT_BASE_URL, DEFAULT_CHART_URL, DEFAULT_OUTPUT, FetchSummary};
pub use omdb::{DEFAULT_OMDB_URL, OmdbProvider};
pub use provider::{MetadataProvider, MovieMetadata};
