//! Component declaration store
//!
//! Ingests component documents once per canonical source location and keeps
//! a second index by declared component name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::declaration::{ComponentDeclaration, SatisfactionClaim};
use super::fetch::{DefaultFetcher, Fetch, Location};
use super::{BatchIngestError, IngestError};

/// Deduplicating store of OpenControl component declarations
///
/// # Usage
///
/// ```ignore
/// use compliancekit::component::ComponentStore;
///
/// let mut store = ComponentStore::new();
/// let component = store.load("https://example.org/AU_policy/component.yaml")?;
/// store.register(component.name.clone(), component);
///
/// assert_eq!(store.count(), 1);
/// assert_eq!(store.component_names(), vec!["Audit Policy"]);
/// ```
pub struct ComponentStore {
    fetcher: Box<dyn Fetch>,

    /// Directory relative file locations resolve against
    base_dir: Option<PathBuf>,

    /// Ingested declarations keyed by canonical source location
    sources: HashMap<String, ComponentDeclaration>,

    /// Registered declarations keyed by name (last write wins)
    components: HashMap<String, ComponentDeclaration>,

    /// Component names in first-registration order
    registration_order: Vec<String>,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("base_dir", &self.base_dir)
            .field("sources", &self.sources.len())
            .field("components", &self.registration_order)
            .finish()
    }
}

impl ComponentStore {
    /// Store backed by the filesystem and HTTP fetcher
    pub fn new() -> Self {
        Self::with_fetcher(Box::new(DefaultFetcher::new()))
    }

    /// Store backed by a custom fetcher
    pub fn with_fetcher(fetcher: Box<dyn Fetch>) -> Self {
        Self {
            fetcher,
            base_dir: None,
            sources: HashMap::new(),
            components: HashMap::new(),
            registration_order: Vec::new(),
        }
    }

    /// Resolve relative file locations against `dir`
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Load a component declaration.
    ///
    /// A location whose canonical key was already ingested returns the
    /// cached declaration without fetching again. On failure the store is
    /// left untouched.
    pub fn load(&mut self, location: &str) -> Result<ComponentDeclaration, IngestError> {
        let resolved = Location::resolve(location, self.base_dir.as_deref())?;
        let key = resolved.key();

        if let Some(existing) = self.sources.get(&key) {
            tracing::debug!(source = %key, "Component already ingested");
            return Ok(existing.clone());
        }

        let bytes = self.fetcher.fetch(&resolved)?;
        let mut declaration =
            ComponentDeclaration::from_slice(&bytes).map_err(|e| IngestError::Parse {
                location: key.clone(),
                message: e.to_string(),
            })?;
        declaration.source = Some(key.clone());

        tracing::info!(
            source = %key,
            component = %declaration.name,
            claims = declaration.satisfies.len(),
            "Component ingested"
        );
        self.sources.insert(key, declaration.clone());
        Ok(declaration)
    }

    /// Load several locations, continuing past failures.
    ///
    /// Returns every declaration on full success; otherwise an error that
    /// carries both the successful loads and every failure in input order.
    pub fn load_all<I, S>(&mut self, locations: I) -> Result<Vec<ComponentDeclaration>, BatchIngestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = Vec::new();
        let mut failures = Vec::new();

        for location in locations {
            match self.load(location.as_ref()) {
                Ok(declaration) => loaded.push(declaration),
                Err(e) => {
                    tracing::warn!(location = location.as_ref(), error = %e, "Component ingestion failed");
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(BatchIngestError { loaded, failures })
        }
    }

    /// Number of distinct source locations ingested
    pub fn count(&self) -> usize {
        self.sources.len()
    }

    /// Declaration ingested from an exact canonical source key
    pub fn get(&self, source_key: &str) -> Option<&ComponentDeclaration> {
        self.sources.get(source_key)
    }

    /// Ingested source keys, sorted
    pub fn source_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sources.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Register a declaration under a name, replacing any earlier entry.
    ///
    /// A replaced name keeps its original registration position.
    pub fn register(&mut self, name: impl Into<String>, declaration: ComponentDeclaration) {
        let name = name.into();
        if !self.components.contains_key(&name) {
            self.registration_order.push(name.clone());
        }
        tracing::debug!(component = %name, "Component registered");
        self.components.insert(name, declaration);
    }

    /// Registered declaration by name
    pub fn component(&self, name: &str) -> Option<&ComponentDeclaration> {
        self.components.get(name)
    }

    /// Registered component names, sorted
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.components.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered components in registration order
    pub fn registered(&self) -> impl Iterator<Item = (&str, &ComponentDeclaration)> + '_ {
        self.registration_order
            .iter()
            .filter_map(|name| self.components.get(name).map(|c| (name.as_str(), c)))
    }

    /// Components claiming `control_id`, with their claims, in registration order
    pub fn satisfying<'a>(
        &'a self,
        control_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, Vec<&'a SatisfactionClaim>)> + 'a {
        self.registered().filter_map(move |(name, component)| {
            let claims = component.claims_for(control_id);
            (!claims.is_empty()).then_some((name, claims))
        })
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
