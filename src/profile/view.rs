//! Control implementation view

use serde::Serialize;

use crate::catalog::ControlRecord;
use crate::component::ImplementationStatus;

/// Catalog data for one control fused with the components that implement it
///
/// `components`, `narrative` and `implementation_status` are aligned: entry
/// `i` of each describes the same component. All three are empty when no
/// registered component claims the control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlImplementationView {
    /// Catalog record (may carry the not-found marker)
    #[serde(flatten)]
    pub control: ControlRecord,

    /// Names of components claiming the control, in registration order
    pub components: Vec<String>,

    /// One narrative per contributing component
    pub narrative: Vec<String>,

    /// Declared status per contributing component
    pub implementation_status: Vec<ImplementationStatus>,
}

impl ControlImplementationView {
    pub fn id(&self) -> &str {
        &self.control.id
    }

    pub fn title(&self) -> Option<&str> {
        self.control.title.as_deref()
    }

    /// Whether the catalog knows this control
    pub fn is_found(&self) -> bool {
        self.control.found
    }

    /// Whether any registered component claims the control
    pub fn is_implemented(&self) -> bool {
        !self.components.is_empty()
    }

    /// `(component, narrative)` pairs in order
    pub fn attributions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.components
            .iter()
            .zip(&self.narrative)
            .map(|(c, n)| (c.as_str(), n.as_str()))
    }
}
