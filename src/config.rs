//! Profile configuration (`compliancekit.toml`)
//!
//! Describes one system: its name, the control catalog to read, the component
//! declarations to ingest and the standards, certifications and roles tables.
//!
//! # Usage
//!
//! ```ignore
//! use compliancekit::config::ProfileConfig;
//!
//! let mut config = ProfileConfig::from_file("compliancekit.toml")?;
//! config.apply_env();
//!
//! let build = config.build()?;
//! for failure in &build.failures {
//!     eprintln!("skipped {}: {}", failure.location(), failure);
//! }
//! println!("{:?}", build.profile.summary());
//! ```
//!
//! # Environment Variables
//!
//! - `COMPLIANCEKIT_CATALOG`: overrides `[catalog] path`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, ControlCatalog};
use crate::component::{ComponentStore, DefaultFetcher, Fetch, IngestError, DEFAULT_FETCH_TIMEOUT};
use crate::parse::parse_duration;
use crate::profile::{CollectionKind, ComplianceProfile, ProfileError};

/// Environment variable overriding the catalog path
pub const CATALOG_ENV: &str = "COMPLIANCEKIT_CATALOG";

/// Root configuration structure for compliancekit.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// System metadata
    pub system: SystemConfig,

    /// Control catalog source
    pub catalog: CatalogConfig,

    /// Component declarations to ingest
    pub components: ComponentsConfig,

    /// Standards keyed by name
    pub standards: BTreeMap<String, toml::Value>,

    /// Certifications keyed by name
    pub certifications: BTreeMap<String, toml::Value>,

    /// Roles keyed by name
    pub roles: BTreeMap<String, toml::Value>,

    /// Directory relative locations resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// `[system]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub name: Option<String>,
}

/// `[catalog]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the 800-53 XML feed
    pub path: Option<PathBuf>,
}

/// `[components]` table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsConfig {
    /// File paths, `file://` or `http(s)://` URLs
    pub locations: Vec<String>,

    /// Remote fetch timeout (e.g., "30s", "2m")
    pub fetch_timeout: Option<String>,
}

/// A profile assembled from configuration, plus components that failed to load
#[derive(Debug)]
pub struct ProfileBuild {
    pub profile: ComplianceProfile,
    pub failures: Vec<IngestError>,
}

impl ProfileConfig {
    /// Load configuration from a file path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_str(&content, path)
    }

    /// Parse configuration from a string
    ///
    /// `path` names the file in errors and anchors relative locations.
    pub fn from_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// A relative `COMPLIANCEKIT_CATALOG` path is taken from the working
    /// directory, not the configuration file's directory.
    pub fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if path.trim().is_empty() {
                return;
            }
            let path = PathBuf::from(path.trim());
            let path = match std::env::current_dir() {
                Ok(cwd) if path.is_relative() => cwd.join(path),
                _ => path,
            };
            tracing::debug!(path = %path.display(), "Catalog path overridden from environment");
            self.catalog.path = Some(path);
        }
    }

    /// Directory relative locations resolve against
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Catalog path resolved against the configuration directory
    pub fn catalog_path(&self) -> Option<PathBuf> {
        let path = self.catalog.path.as_ref()?;
        Some(match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.clone(),
        })
    }

    /// Remote fetch timeout, defaulting to 30 seconds
    pub fn fetch_timeout(&self) -> Result<Duration, ConfigError> {
        match &self.components.fetch_timeout {
            None => Ok(DEFAULT_FETCH_TIMEOUT),
            Some(raw) => parse_duration(raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "components.fetch_timeout".to_string(),
                message: format!("'{}' is not a duration like \"30s\" or \"2m\"", raw),
            }),
        }
    }

    /// Load the catalog from disk and build the profile with the default fetcher
    pub fn build(&self) -> Result<ProfileBuild, ConfigError> {
        let fetcher = DefaultFetcher::with_timeout(self.fetch_timeout()?);
        self.build_with(Box::new(fetcher))
    }

    /// Load the catalog from disk and build the profile with `fetcher`
    pub fn build_with(&self, fetcher: Box<dyn Fetch>) -> Result<ProfileBuild, ConfigError> {
        let path = self.catalog_path().ok_or_else(|| ConfigError::InvalidValue {
            field: "catalog.path".to_string(),
            message: format!("a catalog path is required (or set {})", CATALOG_ENV),
        })?;
        let catalog = Arc::new(ControlCatalog::from_file(&path)?);
        self.build_on(catalog, fetcher)
    }

    /// Build the profile over an already loaded catalog
    ///
    /// Component loads are fail-soft: every failure is returned in
    /// [`ProfileBuild::failures`] and the rest are registered.
    pub fn build_on(
        &self,
        catalog: Arc<ControlCatalog>,
        fetcher: Box<dyn Fetch>,
    ) -> Result<ProfileBuild, ConfigError> {
        let mut store = ComponentStore::with_fetcher(fetcher);
        if let Some(dir) = &self.base_dir {
            store = store.with_base_dir(dir);
        }

        let mut profile = ComplianceProfile::with_store(catalog, store);
        if let Some(name) = &self.system.name {
            profile.set_name(name.clone());
        }

        for (kind, table) in [
            (CollectionKind::Standards, &self.standards),
            (CollectionKind::Certifications, &self.certifications),
            (CollectionKind::Roles, &self.roles),
        ] {
            for (name, value) in table {
                let record = serde_json::to_value(value).map_err(|e| ConfigError::InvalidValue {
                    field: format!("{}.{}", kind, name),
                    message: e.to_string(),
                })?;
                profile.insert(kind, name.clone(), record)?;
            }
        }

        let failures = match profile.add_components_from_locations(&self.components.locations) {
            Ok(_) => Vec::new(),
            Err(batch) => batch.failures,
        };

        tracing::info!(
            system = profile.name(),
            components = profile.components().len(),
            failures = failures.len(),
            "Profile built from configuration"
        );

        Ok(ProfileBuild { profile, failures })
    }
}

/// Errors from loading configuration or building a profile from it
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file read error
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::MemoryFetcher;

    const CATALOG_XML: &str = r#"<controls>
  <control>
    <family>AUDIT AND ACCOUNTABILITY</family>
    <number>AU-1</number>
    <title>AUDIT AND ACCOUNTABILITY POLICY AND PROCEDURES</title>
    <statement><description>The organization develops an audit policy.</description></statement>
  </control>
</controls>"#;

    const AUDIT_COMPONENT: &str = "name: Audit Policy\nsatisfies:\n  - control_key: AU-1\n    narrative: Published annually.\n";

    const CONFIG: &str = r#"
[system]
name = "GovReady WordPress Dashboard"

[catalog]
path = "controls.xml"

[components]
locations = ["audit.yaml", "missing.yaml"]

[standards."FRIST-800-53"]
other_key = "some value"

[certifications."FRed-RAMP-Low"]
level = 1

[roles."System Owner"]
contact = "owner@example.org"
"#;

    #[test]
    fn test_parse_config() {
        let config = ProfileConfig::from_str(CONFIG, Path::new("/srv/oc/compliancekit.toml")).unwrap();
        assert_eq!(config.system.name.as_deref(), Some("GovReady WordPress Dashboard"));
        assert_eq!(config.components.locations, vec!["audit.yaml", "missing.yaml"]);
        assert_eq!(config.catalog_path(), Some(PathBuf::from("/srv/oc/controls.xml")));
        assert_eq!(config.fetch_timeout().unwrap(), DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ProfileConfig::from_str("", Path::new("compliancekit.toml")).unwrap();
        assert!(config.system.name.is_none());
        assert!(config.components.locations.is_empty());
        assert!(config.base_dir().is_none());
        assert!(config.catalog_path().is_none());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = ProfileConfig::from_str("[system\nname = 1", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == Path::new("bad.toml")));
    }

    #[test]
    fn test_invalid_fetch_timeout() {
        let config = ProfileConfig::from_str(
            "[components]\nfetch_timeout = \"soon\"\n",
            Path::new("compliancekit.toml"),
        )
        .unwrap();
        assert!(matches!(
            config.fetch_timeout(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "components.fetch_timeout"
        ));
    }

    #[test]
    fn test_build_requires_catalog() {
        let config = ProfileConfig::default();
        let err = config.build_with(Box::new(MemoryFetcher::new())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "catalog.path"));
    }

    #[test]
    fn test_build_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("controls.xml"), CATALOG_XML).unwrap();
        std::fs::write(dir.path().join("audit.yaml"), AUDIT_COMPONENT).unwrap();
        let config_path = dir.path().join("compliancekit.toml");
        std::fs::write(&config_path, CONFIG).unwrap();

        let config = ProfileConfig::from_file(&config_path).unwrap();
        let build = config.build().unwrap();

        assert_eq!(build.failures.len(), 1);
        assert!(build.failures[0].location().ends_with("missing.yaml"));

        let summary = build.profile.summary();
        assert_eq!(summary.name, "GovReady WordPress Dashboard");
        assert_eq!(summary.components, vec!["Audit Policy"]);
        assert_eq!(summary.standards, vec!["FRIST-800-53"]);
        assert_eq!(summary.certifications, vec!["FRed-RAMP-Low"]);
        assert_eq!(build.profile.roles(), vec!["System Owner"]);
        assert_eq!(
            build.profile.entry(CollectionKind::Certifications, "FRed-RAMP-Low").unwrap(),
            Some(serde_json::json!({"level": 1}))
        );

        let view = build.profile.control("AU-1");
        assert!(view.is_found());
        assert_eq!(view.components, vec!["Audit Policy"]);
        assert_eq!(view.narrative, vec!["Published annually."]);
    }

    #[test]
    fn test_build_on_shared_catalog() {
        let catalog = Arc::new(ControlCatalog::from_xml(CATALOG_XML).unwrap());
        let config = ProfileConfig::from_str(
            "[components]\nlocations = [\"https://example.org/audit.yaml\"]\n",
            Path::new("compliancekit.toml"),
        )
        .unwrap();
        let fetcher = MemoryFetcher::new().with_document("https://example.org/audit.yaml", AUDIT_COMPONENT);

        let build = config.build_on(catalog, Box::new(fetcher)).unwrap();
        assert!(build.failures.is_empty());
        assert_eq!(build.profile.name(), crate::profile::DEFAULT_SYSTEM_NAME);
        assert_eq!(build.profile.components(), vec!["Audit Policy"]);
    }

    #[test]
    fn test_missing_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ProfileConfig::from_str("[catalog]\npath = \"nope.xml\"\n", &dir.path().join("c.toml")).unwrap();
        let err = config.build_with(Box::new(MemoryFetcher::new())).unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(CatalogError::Io { .. })));
    }

    #[test]
    fn test_env_overrides_catalog_path() {
        let mut config = ProfileConfig::from_str("[catalog]\npath = \"controls.xml\"\n", Path::new("/srv/oc/c.toml")).unwrap();
        std::env::set_var(CATALOG_ENV, "/opt/catalogs/800-53.xml");
        config.apply_env();
        std::env::remove_var(CATALOG_ENV);
        assert_eq!(config.catalog_path(), Some(PathBuf::from("/opt/catalogs/800-53.xml")));
    }
}
