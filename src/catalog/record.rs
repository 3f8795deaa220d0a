//! Normalized control records

use serde::{Deserialize, Serialize};

use super::text::split_description;

/// Party responsible for a control, derived from the statement's leading phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Responsible {
    /// "The organization ..."
    Organization,
    /// "The information system ..."
    InformationSystem,
    /// "[Withdrawn ..."
    Withdrawn,
    /// Anything else
    #[default]
    Other,
}

impl Responsible {
    /// Classify by prefix. Only the very start of the text is inspected.
    pub fn from_statement(text: &str) -> Self {
        if text.starts_with("The organization") {
            Self::Organization
        } else if text.starts_with("The information system") {
            Self::InformationSystem
        } else if text.starts_with("[Withdrawn") {
            Self::Withdrawn
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for Responsible {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::InformationSystem => write!(f, "information-system"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Supplemental guidance attached to a control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplementalGuidance {
    /// Guidance prose (empty when the catalog has none)
    #[serde(default)]
    pub description: String,

    /// Related control identifiers, in catalog order
    #[serde(default)]
    pub related: Vec<String>,
}

/// A single control or control enhancement, normalized from the catalog
///
/// Records are built per lookup. A lookup that matches nothing still
/// yields a record, with `found == false` and every descriptive field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRecord {
    /// Identifier as requested, e.g. "AC-4" or "AC-2 (1)"
    pub id: String,

    /// Whether the catalog holds an entry with this identifier
    pub found: bool,

    /// Control family, e.g. "ACCESS CONTROL" (absent for enhancements)
    #[serde(default)]
    pub family: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Priority code, e.g. "P1" (absent for enhancements)
    #[serde(default)]
    pub priority: Option<String>,

    /// Statement text in reading order, markup stripped
    #[serde(default, rename = "description")]
    pub statement: Option<String>,

    /// First line of the statement
    #[serde(default)]
    pub description_intro: Option<String>,

    /// Remaining statement lines with numbered sub-items folded in
    #[serde(default)]
    pub description_sections: Vec<String>,

    pub responsible: Option<Responsible>,

    #[serde(default)]
    pub supplemental_guidance: SupplementalGuidance,

    /// Enhancement identifiers nested under a base control
    #[serde(default)]
    pub control_enhancements: Vec<String>,

    /// Baseline impact levels, e.g. ["LOW", "MODERATE", "HIGH"]
    #[serde(default)]
    pub baseline_impact: Vec<String>,

    /// Base control identifier for an enhancement
    #[serde(default)]
    pub parent: Option<String>,

    /// Controls a withdrawn control was incorporated into
    #[serde(default)]
    pub withdrawn_into: Vec<String>,

    /// Required catalog fields the matched entry lacked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

impl ControlRecord {
    /// Record for an identifier the catalog does not contain
    pub fn not_found(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            found: false,
            family: None,
            title: None,
            priority: None,
            statement: None,
            description_intro: None,
            description_sections: Vec::new(),
            responsible: None,
            supplemental_guidance: SupplementalGuidance::default(),
            control_enhancements: Vec::new(),
            baseline_impact: Vec::new(),
            parent: None,
            withdrawn_into: Vec::new(),
            missing_fields: Vec::new(),
        }
    }

    /// Fill the fields derived from the statement text
    ///
    /// Only called for matched entries; one without a statement is
    /// [`Responsible::Other`].
    pub(crate) fn derive_description(&mut self) {
        let (intro, sections) = split_description(self.statement.as_deref());
        self.description_intro = intro;
        self.description_sections = sections;
        self.responsible = Some(Responsible::from_statement(
            self.statement.as_deref().unwrap_or_default(),
        ));
    }

    /// Check if this is a control enhancement identifier
    pub fn is_enhancement(&self) -> bool {
        is_enhancement_id(&self.id)
    }

    /// Check if the matched entry was missing required fields
    pub fn is_malformed(&self) -> bool {
        !self.missing_fields.is_empty()
    }

    /// JSON rendering of the record
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// YAML rendering of the record
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Enhancement identifiers carry a parenthesized suffix, e.g. "AC-2 (1)"
pub fn is_enhancement_id(id: &str) -> bool {
    id.contains('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsible_prefixes() {
        assert_eq!(
            Responsible::from_statement("The organization develops..."),
            Responsible::Organization
        );
        assert_eq!(
            Responsible::from_statement("The information system enforces..."),
            Responsible::InformationSystem
        );
        assert_eq!(
            Responsible::from_statement("[Withdrawn: Incorporated into AC-2]."),
            Responsible::Withdrawn
        );
        assert_eq!(Responsible::from_statement("Employs a policy..."), Responsible::Other);
    }

    #[test]
    fn test_responsible_is_prefix_only() {
        // the phrase appearing later does not count
        assert_eq!(
            Responsible::from_statement("Ensures that the organization reviews..."),
            Responsible::Other
        );
        assert_eq!(
            Responsible::from_statement(" The organization"),
            Responsible::Other
        );
    }

    #[test]
    fn test_responsible_serializes_kebab_case() {
        let json = serde_json::to_string(&Responsible::InformationSystem).unwrap();
        assert_eq!(json, "\"information-system\"");
        assert_eq!(Responsible::InformationSystem.to_string(), "information-system");
    }

    #[test]
    fn test_not_found_record_is_marked() {
        let record = ControlRecord::not_found("AC-200");
        assert!(!record.found);
        assert_eq!(record.title, None);
        assert_eq!(record.statement, None);
        assert!(record.description_sections.is_empty());
        assert!(!record.is_malformed());
    }

    #[test]
    fn test_derive_description() {
        let mut record = ControlRecord::not_found("AC-1");
        record.found = true;
        record.statement = Some("The organization:\n\tAC-1a. Develops a policy;".to_string());
        record.derive_description();

        assert_eq!(record.description_intro.as_deref(), Some("The organization:"));
        assert_eq!(record.description_sections, vec!["AC-1a. Develops a policy;"]);
        assert_eq!(record.responsible, Some(Responsible::Organization));
    }

    #[test]
    fn test_export_formats() {
        let mut record = ControlRecord::not_found("AC-4");
        record.found = true;
        record.title = Some("INFORMATION FLOW ENFORCEMENT".to_string());

        let json = record.to_json().unwrap();
        assert!(json.contains("\"title\": \"INFORMATION FLOW ENFORCEMENT\""));
        let yaml = record.to_yaml().unwrap();
        assert!(yaml.contains("id: AC-4"));
    }

    #[test]
    fn test_enhancement_ids() {
        assert!(is_enhancement_id("AC-2 (1)"));
        assert!(!is_enhancement_id("AC-2"));
    }
}
