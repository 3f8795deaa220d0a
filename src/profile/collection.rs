//! Named collection kinds of a system profile

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProfileError;

/// The four collections a system profile holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Components,
    Standards,
    Certifications,
    Roles,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        Self::Components,
        Self::Standards,
        Self::Certifications,
        Self::Roles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Standards => "standards",
            Self::Certifications => "certifications",
            Self::Roles => "roles",
        }
    }
}

impl FromStr for CollectionKind {
    type Err = ProfileError;

    /// Exact, lowercase collection names only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ProfileError::UnknownCollection { kind: s.to_string() })
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
