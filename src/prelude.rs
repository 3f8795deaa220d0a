//! Common imports
//!
//! # Usage
//!
//! ```ignore
//! use compliancekit::prelude::*;
//!
//! let build = ProfileConfig::from_file("compliancekit.toml")?.build()?;
//! let view = build.profile.control("AC-2 (1)");
//! ```
//!
//! # What's Included
//!
//! ## Catalog
//! - [`ControlCatalog`], [`ControlRecord`], [`Responsible`]
//!
//! ## Components
//! - [`ComponentDeclaration`], [`ComponentStore`], [`ImplementationStatus`]
//! - [`Fetch`], [`DefaultFetcher`], [`Location`]
//!
//! ## Profiles
//! - [`ComplianceProfile`], [`CollectionKind`], [`ControlImplementationView`], [`Summary`]
//! - [`ProfileConfig`] for `compliancekit.toml`
//!
//! ## Logging
//! - [`init_tracing`], [`LogConfig`], [`LogFormat`]

pub use crate::catalog::{CatalogError, ControlCatalog, ControlRecord, Responsible};
pub use crate::component::{
    BatchIngestError, ComponentDeclaration, ComponentStore, DefaultFetcher, Fetch,
    ImplementationStatus, IngestError, Location,
};
pub use crate::config::{ConfigError, ProfileBuild, ProfileConfig};
pub use crate::observability::{init_tracing, LogConfig, LogFormat};
pub use crate::profile::{
    CollectionKind, ComplianceProfile, ControlImplementationView, ProfileError, Summary,
};
