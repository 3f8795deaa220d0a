//! Control catalog loading and lookup

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::feed::{is_field, walk_controls, CatalogEntry};
use super::record::{is_enhancement_id, ControlRecord};

/// An immutable, indexed NIST 800-53 control catalog
///
/// The feed is parsed once; every lookup afterwards reads the index only.
/// Share one catalog between profiles with `Arc<ControlCatalog>`.
///
/// # Usage
///
/// ```ignore
/// use compliancekit::catalog::ControlCatalog;
///
/// let catalog = ControlCatalog::from_file("data/800-53-controls.xml")?;
///
/// let ac4 = catalog.lookup("AC-4");
/// println!("{}: {:?}", ac4.id, ac4.title);
///
/// let enhancement = catalog.lookup("AC-2 (1)");
/// assert_eq!(enhancement.parent.as_deref(), Some("AC-2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    /// Feed publication date, when the feed declares one
    version: Option<String>,

    /// Base controls keyed by canonical number
    controls: HashMap<String, CatalogEntry>,

    /// Control enhancements keyed by canonical number, e.g. "AC-2 (1)"
    enhancements: HashMap<String, CatalogEntry>,

    /// Base control numbers in document order
    order: Vec<String>,
}

impl ControlCatalog {
    /// Load a catalog from an XML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::from_xml(&content)?;
        tracing::info!(
            path = %path.display(),
            controls = catalog.controls.len(),
            enhancements = catalog.enhancements.len(),
            "Control catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a catalog from XML content
    pub fn from_xml(xml: &str) -> Result<Self, CatalogError> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| CatalogError::Xml(e.to_string()))?;
        let root = doc.root_element();
        if !is_field(&root, "controls") {
            return Err(CatalogError::NotACatalog {
                root: root.tag_name().name().to_string(),
            });
        }

        let mut catalog = Self {
            version: root.attribute("pub_date").map(str::to_string),
            ..Self::default()
        };

        for entry in walk_controls(root) {
            if entry.number.is_empty() {
                tracing::warn!("Skipping catalog entry without a number");
                continue;
            }
            if !entry.missing_fields.is_empty() {
                tracing::warn!(
                    control = %entry.number,
                    missing = ?entry.missing_fields,
                    "Catalog entry is missing required fields"
                );
            }

            let index = if entry.parent.is_some() {
                &mut catalog.enhancements
            } else {
                &mut catalog.controls
            };
            if index.contains_key(&entry.number) {
                tracing::warn!(control = %entry.number, "Duplicate catalog entry ignored");
                continue;
            }
            if entry.parent.is_none() {
                catalog.order.push(entry.number.clone());
            }
            index.insert(entry.number.clone(), entry);
        }

        Ok(catalog)
    }

    /// Look up a control or control enhancement by its exact identifier.
    ///
    /// Identifiers with a parenthesized suffix resolve against the
    /// enhancements, all others against the base controls. Matching is
    /// case-sensitive. An unknown identifier yields a record with
    /// `found == false` rather than an error.
    pub fn lookup(&self, id: &str) -> ControlRecord {
        let index = if is_enhancement_id(id) {
            &self.enhancements
        } else {
            &self.controls
        };

        match index.get(id) {
            Some(entry) => {
                tracing::debug!(control = id, "Catalog lookup matched");
                entry.to_record()
            }
            None => {
                tracing::debug!(control = id, "Control not found in catalog");
                ControlRecord::not_found(id)
            }
        }
    }

    /// Strict lookup: an unknown identifier is an error
    pub fn require(&self, id: &str) -> Result<ControlRecord, CatalogError> {
        let record = self.lookup(id);
        if record.found {
            Ok(record)
        } else {
            Err(CatalogError::ControlNotFound { id: id.to_string() })
        }
    }

    /// Check if the catalog holds an entry for this identifier
    pub fn contains(&self, id: &str) -> bool {
        self.controls.contains_key(id) || self.enhancements.contains_key(id)
    }

    /// Feed publication date
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Base control identifiers in document order
    pub fn control_ids(&self) -> &[String] {
        &self.order
    }

    /// Number of base controls plus enhancements
    pub fn len(&self) -> usize {
        self.controls.len() + self.enhancements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors that can occur when loading a control catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not well-formed XML
    #[error("Failed to parse catalog XML: {0}")]
    Xml(String),

    /// Root element is not a control feed
    #[error("Not a control catalog: unexpected root element <{root}>")]
    NotACatalog { root: String },

    /// Strict lookup found no matching entry
    #[error("Control not found in catalog: {id}")]
    ControlNotFound { id: String },
}
