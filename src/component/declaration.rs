//! OpenControl component declarations
//!
//! Parses `component.yaml` files following the OpenControl schema
//! (versions 2.x and 3.x).

use serde::{Deserialize, Deserializer, Serialize};

/// An OpenControl component declaration
///
/// Field names are the OpenControl convention and must stay as they are to
/// read existing declaration files. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDeclaration {
    /// Canonical source location, set on ingestion
    #[serde(skip)]
    pub source: Option<String>,

    /// Component name (e.g., "Audit Policy")
    pub name: String,

    /// Short component key (e.g., "AU_policy")
    #[serde(default)]
    pub key: Option<String>,

    /// OpenControl schema version (e.g., "3.0.0")
    #[serde(default)]
    pub schema_version: Option<serde_yaml::Value>,

    #[serde(default)]
    pub documentation_complete: Option<bool>,

    /// Role accountable for the component
    #[serde(default)]
    pub responsible_role: Option<String>,

    /// Supporting documentation
    #[serde(default)]
    pub references: Vec<Reference>,

    /// Controls this component claims to satisfy
    #[serde(default)]
    pub satisfies: Vec<SatisfactionClaim>,
}

impl ComponentDeclaration {
    /// Parse a declaration from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse a declaration from raw bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_slice(bytes)
    }

    /// Claims whose control key matches `control_id` exactly
    pub fn claims_for(&self, control_id: &str) -> Vec<&SatisfactionClaim> {
        self.satisfies
            .iter()
            .filter(|c| c.control_key == control_id)
            .collect()
    }

    /// Check if this component claims to satisfy a control
    pub fn satisfies_control(&self, control_id: &str) -> bool {
        self.satisfies.iter().any(|c| c.control_key == control_id)
    }

    /// Unique control keys in declaration order
    pub fn control_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for claim in &self.satisfies {
            if !keys.contains(&claim.control_key.as_str()) {
                keys.push(&claim.control_key);
            }
        }
        keys
    }
}

/// A documentation reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub path: String,

    /// Reference type, e.g. "URL" or "Image"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One satisfaction claim: a control key with narrative and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionClaim {
    /// Control identifier (e.g., "AC-4", "AC-2 (1)")
    pub control_key: String,

    /// Standard the control belongs to (e.g., "NIST-800-53")
    #[serde(default)]
    pub standard_key: Option<String>,

    /// Verifications backing the claim
    #[serde(default)]
    pub covered_by: Vec<serde_yaml::Value>,

    #[serde(default, deserialize_with = "status_or_unknown")]
    pub implementation_status: ImplementationStatus,

    #[serde(default)]
    pub narrative: Option<Narrative>,
}

impl SatisfactionClaim {
    /// Narrative flattened to one text block (empty when absent)
    pub fn narrative_text(&self) -> String {
        self.narrative
            .as_ref()
            .map(Narrative::text)
            .unwrap_or_default()
    }
}

/// Implementation narrative: plain text (schema 2.x) or keyed parts (3.x)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Narrative {
    Text(String),
    Parts(Vec<NarrativePart>),
}

impl Narrative {
    /// Flatten to one text block; keyed parts render as `"key: text"`
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.trim_end().to_string(),
            Self::Parts(parts) => parts
                .iter()
                .map(|p| match &p.key {
                    Some(key) => format!("{}: {}", key, p.text.trim_end()),
                    None => p.text.trim_end().to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A keyed narrative part, e.g. the text addressing sub-section "a"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativePart {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub text: String,
}

/// Declared implementation status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationStatus {
    Complete,
    Partial,
    Planned,
    /// Declared as "none"
    #[serde(rename = "none")]
    NotImplemented,
    #[serde(rename = "not applicable")]
    NotApplicable,
    /// Absent or unrecognized
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ImplementationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Planned => write!(f, "planned"),
            Self::NotImplemented => write!(f, "none"),
            Self::NotApplicable => write!(f, "not applicable"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<ImplementationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ImplementationStatus>::deserialize(deserializer)?.unwrap_or_default())
}
