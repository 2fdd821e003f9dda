//! Adapters that expose anime and manga websites through one uniform contract:
//! listings, search with site-specific filters, details, episodes or chapters,
//! and playable videos or page images.

pub mod config;
pub mod error;
pub mod extractors;
pub mod filters;
pub mod models;
pub mod preferences;
pub mod registry;
pub mod sources;
pub mod traits;
pub mod utils;

pub use config::Config;
pub use error::{Result, SourceError};
pub use registry::{SourceKind, SourceRegistry};
