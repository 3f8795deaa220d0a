//! # ComplianceKit
//!
//! NIST 800-53 control lookups fused with OpenControl component declarations.
//!
//! A [`ControlCatalog`] is read once from the NIST SP 800-53 XML feed and
//! answers lookups by control or enhancement id. A [`ComplianceProfile`]
//! ingests component declarations (YAML, from files or over HTTP), keeps
//! standards, certifications and roles alongside them, and answers
//! "which components implement this control, and how".
//!
//! ## Features
//!
//! - **Catalog lookups**: normalized control records with derived
//!   responsibility and a description split into intro and sections
//! - **Component ingestion**: file paths, `file://` and `http(s)://`
//!   locations, deduplicated by canonical location
//! - **Control views**: catalog data plus per-component narratives and
//!   implementation status
//! - **Configuration**: one `compliancekit.toml` per system
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use compliancekit::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_tracing(&LogConfig::from_env())?;
//!
//!     let catalog = Arc::new(ControlCatalog::from_file("data/800-53-controls.xml")?);
//!     let mut profile = ComplianceProfile::new(catalog);
//!     profile.set_name("GovReady WordPress Dashboard");
//!     profile.add_component_from_location(
//!         "https://raw.githubusercontent.com/opencontrol/cf-compliance/master/UAA/component.yaml",
//!     )?;
//!
//!     let view = profile.control("AC-4");
//!     println!("{} {:?}: {:?}", view.id(), view.title(), view.components);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `http` (default): fetch component declarations over http(s) with `reqwest`

#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod component;
pub mod config;
pub mod observability;
pub mod parse;
pub mod prelude;
pub mod profile;

pub use catalog::{CatalogError, ControlCatalog, ControlRecord, Responsible};
pub use component::{
    BatchIngestError, ComponentDeclaration, ComponentStore, DefaultFetcher, Fetch,
    ImplementationStatus, IngestError, Location,
};
pub use config::{ConfigError, ProfileBuild, ProfileConfig};
pub use observability::{init_tracing, LogConfig, LogFormat, ObservabilityError};
pub use parse::parse_duration;
pub use profile::{
    CollectionKind, ComplianceProfile, ControlImplementationView, ProfileError, Summary,
};
