//! System Compliance Profile
//!
//! Aggregates one system's components, standards, certifications and roles
//! and answers "who implements this control, and how".
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use compliancekit::catalog::ControlCatalog;
//! use compliancekit::profile::ComplianceProfile;
//!
//! let catalog = Arc::new(ControlCatalog::from_file("data/800-53-controls.xml")?);
//! let mut profile = ComplianceProfile::new(catalog);
//! profile.set_name("GovReady WordPress Dashboard");
//! profile.add_component_from_location("file:///srv/oc/UAA_component.yaml")?;
//! profile.add_dict_entry("standards", "FRIST-800-53", serde_json::json!({"other_key": "some value"}))?;
//!
//! let view = profile.control("AC-4");
//! for (component, narrative) in view.attributions() {
//!     println!("{}: {}", component, narrative);
//! }
//! ```
//!
//! # Concurrency
//!
//! A profile is single-owner: every mutation takes `&mut self`. The catalog
//! is immutable and shared through `Arc`, so several profiles in one process
//! read the same catalog without interfering.

mod collection;
mod view;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::ControlCatalog;
use crate::component::{BatchIngestError, ComponentDeclaration, ComponentStore, IngestError};

pub use collection::CollectionKind;
pub use view::ControlImplementationView;

/// Name a profile carries until one is set
pub const DEFAULT_SYSTEM_NAME: &str = "Unnamed System";

/// The compliance profile of one system
#[derive(Debug)]
pub struct ComplianceProfile {
    name: String,
    catalog: Arc<ControlCatalog>,
    components: ComponentStore,
    standards: BTreeMap<String, serde_json::Value>,
    certifications: BTreeMap<String, serde_json::Value>,
    roles: BTreeMap<String, serde_json::Value>,
}

impl ComplianceProfile {
    /// Empty profile with the default filesystem/HTTP component store
    pub fn new(catalog: Arc<ControlCatalog>) -> Self {
        Self::with_store(catalog, ComponentStore::new())
    }

    /// Empty profile over an existing component store
    pub fn with_store(catalog: Arc<ControlCatalog>, components: ComponentStore) -> Self {
        Self {
            name: DEFAULT_SYSTEM_NAME.to_string(),
            catalog,
            components,
            standards: BTreeMap::new(),
            certifications: BTreeMap::new(),
            roles: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn catalog(&self) -> &ControlCatalog {
        &self.catalog
    }

    /// The underlying component store (source and name indices)
    pub fn store(&self) -> &ComponentStore {
        &self.components
    }

    /// Add or replace an entry in a collection named by string.
    ///
    /// Fails with [`ProfileError::UnknownCollection`] for anything other
    /// than `components`, `standards`, `certifications` or `roles`.
    pub fn add_dict_entry(
        &mut self,
        kind: &str,
        name: impl Into<String>,
        record: serde_json::Value,
    ) -> Result<(), ProfileError> {
        let kind: CollectionKind = kind.parse()?;
        self.insert(kind, name, record)
    }

    /// Add or replace an entry in a collection.
    ///
    /// Component records must deserialize as a [`ComponentDeclaration`].
    pub fn insert(
        &mut self,
        kind: CollectionKind,
        name: impl Into<String>,
        record: serde_json::Value,
    ) -> Result<(), ProfileError> {
        let name = name.into();
        match kind {
            CollectionKind::Components => {
                let declaration: ComponentDeclaration = serde_json::from_value(record)
                    .map_err(|e| ProfileError::InvalidComponentRecord {
                        name: name.clone(),
                        message: e.to_string(),
                    })?;
                self.components.register(name, declaration);
            }
            CollectionKind::Standards => {
                self.standards.insert(name, record);
            }
            CollectionKind::Certifications => {
                self.certifications.insert(name, record);
            }
            CollectionKind::Roles => {
                self.roles.insert(name, record);
            }
        }
        Ok(())
    }

    /// Register a declaration under its own name
    pub fn add_component(&mut self, declaration: ComponentDeclaration) {
        let name = declaration.name.clone();
        self.components.register(name, declaration);
    }

    /// Load a component declaration and register it under its declared name
    pub fn add_component_from_location(
        &mut self,
        location: &str,
    ) -> Result<ComponentDeclaration, ProfileError> {
        let declaration = self.components.load(location)?;
        self.add_component(declaration.clone());
        Ok(declaration)
    }

    /// Load and register several components, continuing past failures.
    ///
    /// Every successful load is registered before the collected failures are
    /// returned.
    pub fn add_components_from_locations<I, S>(
        &mut self,
        locations: I,
    ) -> Result<Vec<String>, BatchIngestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.components.load_all(locations) {
            Ok(loaded) => Ok(loaded
                .into_iter()
                .map(|declaration| {
                    let name = declaration.name.clone();
                    self.add_component(declaration);
                    name
                })
                .collect()),
            Err(batch) => {
                for declaration in &batch.loaded {
                    self.add_component(declaration.clone());
                }
                Err(batch)
            }
        }
    }

    /// Sorted entry names of a collection
    pub fn list_names(&self, kind: CollectionKind) -> Vec<String> {
        match kind {
            CollectionKind::Components => self.components.component_names(),
            CollectionKind::Standards => self.standards.keys().cloned().collect(),
            CollectionKind::Certifications => self.certifications.keys().cloned().collect(),
            CollectionKind::Roles => self.roles.keys().cloned().collect(),
        }
    }

    /// One entry of a collection as a structured record
    ///
    /// A registered component whose YAML has no JSON form (e.g. a
    /// `covered_by` mapping with non-string keys) is an error, not a miss.
    pub fn entry(
        &self,
        kind: CollectionKind,
        name: &str,
    ) -> Result<Option<serde_json::Value>, ProfileError> {
        let record = match kind {
            CollectionKind::Components => match self.components.component(name) {
                Some(component) => Some(serde_json::to_value(component).map_err(|e| {
                    ProfileError::ComponentEncoding {
                        name: name.to_string(),
                        source: e,
                    }
                })?),
                None => None,
            },
            CollectionKind::Standards => self.standards.get(name).cloned(),
            CollectionKind::Certifications => self.certifications.get(name).cloned(),
            CollectionKind::Roles => self.roles.get(name).cloned(),
        };
        Ok(record)
    }

    pub fn components(&self) -> Vec<String> {
        self.list_names(CollectionKind::Components)
    }

    pub fn standards(&self) -> Vec<String> {
        self.list_names(CollectionKind::Standards)
    }

    pub fn certifications(&self) -> Vec<String> {
        self.list_names(CollectionKind::Certifications)
    }

    pub fn roles(&self) -> Vec<String> {
        self.list_names(CollectionKind::Roles)
    }

    /// Name plus sorted component, standard and certification names
    pub fn summary(&self) -> Summary {
        Summary {
            name: self.name.clone(),
            components: self.components(),
            standards: self.standards(),
            certifications: self.certifications(),
        }
    }

    /// Catalog record for `id` plus every registered component claiming it.
    ///
    /// Components appear in registration order. Several claims of one
    /// component for the same control share a single narrative entry.
    pub fn control(&self, id: &str) -> ControlImplementationView {
        let control = self.catalog.lookup(id);

        let mut components = Vec::new();
        let mut narrative = Vec::new();
        let mut implementation_status = Vec::new();

        for (name, claims) in self.components.satisfying(id) {
            components.push(name.to_string());
            narrative.push(
                claims
                    .iter()
                    .map(|c| c.narrative_text())
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
            implementation_status.push(
                claims
                    .first()
                    .map(|c| c.implementation_status)
                    .unwrap_or_default(),
            );
        }

        tracing::debug!(
            control = id,
            found = control.found,
            components = components.len(),
            "Control implementation view assembled"
        );

        ControlImplementationView {
            control,
            components,
            narrative,
            implementation_status,
        }
    }
}

/// Summary of a system profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub name: String,
    pub components: Vec<String>,
    pub standards: Vec<String>,
    pub certifications: Vec<String>,
}

/// Errors from profile operations
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Collection kind outside components/standards/certifications/roles
    #[error("Unknown collection '{kind}'. Valid options: components, standards, certifications, roles")]
    UnknownCollection { kind: String },

    /// Component record is not a valid declaration
    #[error("Invalid component record '{name}': {message}")]
    InvalidComponentRecord { name: String, message: String },

    /// Registered component has no JSON form
    #[error("Component '{name}' cannot be rendered as a record: {source}")]
    ComponentEncoding {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}
