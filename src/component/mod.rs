//! OpenControl Component Declarations
//!
//! Loads component declarations (`component.yaml`) from local files or
//! URLs, deduplicates them by canonical source location, and indexes them
//! by component name.
//!
//! # Usage
//!
//! ```ignore
//! use compliancekit::component::ComponentStore;
//!
//! let mut store = ComponentStore::new();
//! let uaa = store.load("file:///srv/opencontrol/UAA/component.yaml")?;
//! store.register(uaa.name.clone(), uaa);
//!
//! for (name, claims) in store.satisfying("AC-4") {
//!     println!("{} covers AC-4 with {} claim(s)", name, claims.len());
//! }
//! ```

mod declaration;
mod fetch;
mod store;

use thiserror::Error;

pub use declaration::{
    ComponentDeclaration, ImplementationStatus, Narrative, NarrativePart, Reference,
    SatisfactionClaim,
};
pub use fetch::{DefaultFetcher, Fetch, Location, MemoryFetcher, DEFAULT_FETCH_TIMEOUT};
pub use store::ComponentStore;

/// Failure to ingest one component document
#[derive(Debug, Error)]
pub enum IngestError {
    /// Location string could not be resolved
    #[error("Invalid component location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    /// Document could not be retrieved
    #[error("Failed to fetch component {location}: {message}")]
    Fetch { location: String, message: String },

    /// Document is not a valid component declaration
    #[error("Failed to parse component {location}: {message}")]
    Parse { location: String, message: String },
}

impl IngestError {
    /// The location that failed
    pub fn location(&self) -> &str {
        match self {
            Self::InvalidLocation { location, .. }
            | Self::Fetch { location, .. }
            | Self::Parse { location, .. } => location,
        }
    }
}

/// Failures collected from a fail-soft batch load
#[derive(Debug, Error)]
#[error("{count} component(s) failed to load", count = .failures.len())]
pub struct BatchIngestError {
    /// Declarations that loaded successfully
    pub loaded: Vec<ComponentDeclaration>,

    /// Every failure, in input order
    pub failures: Vec<IngestError>,
}
