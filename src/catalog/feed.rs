//! NIST SP 800-53 XML feed walker
//!
//! Walks the parsed document tree once and extracts one [`CatalogEntry`] per
//! control and control enhancement.

use roxmltree::Node;

use super::record::{ControlRecord, SupplementalGuidance};

/// Namespace of the feed envelope (`controls:controls`, `controls:control`)
pub const FEED_NS: &str = "http://scap.nist.gov/schema/sp800-53/feed/2.0";

/// Namespace of the control fields (`number`, `title`, `statement`, ...)
pub const CONTROL_NS: &str = "http://scap.nist.gov/schema/sp800-53/2.0";

/// Raw fields of one catalog entry, before derived fields are computed
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogEntry {
    pub number: String,
    pub family: Option<String>,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub statement: Option<String>,
    pub guidance: SupplementalGuidance,
    pub enhancements: Vec<String>,
    pub baseline_impact: Vec<String>,
    pub parent: Option<String>,
    pub withdrawn_into: Vec<String>,
    pub missing_fields: Vec<String>,
}

impl CatalogEntry {
    /// Build the normalized record for this entry
    pub fn to_record(&self) -> ControlRecord {
        let mut record = ControlRecord::not_found(self.number.clone());
        record.found = true;
        record.family = self.family.clone();
        record.title = self.title.clone();
        record.priority = self.priority.clone();
        record.statement = self.statement.clone();
        record.supplemental_guidance = self.guidance.clone();
        record.control_enhancements = self.enhancements.clone();
        record.baseline_impact = self.baseline_impact.clone();
        record.parent = self.parent.clone();
        record.withdrawn_into = self.withdrawn_into.clone();
        record.missing_fields = self.missing_fields.clone();
        record.derive_description();
        record
    }
}

/// Check element local name, accepting the feed namespaces or none at all
pub(crate) fn is_field(node: &Node<'_, '_>, name: &str) -> bool {
    if !node.is_element() || node.tag_name().name() != name {
        return false;
    }
    matches!(node.tag_name().namespace(), None | Some(CONTROL_NS) | Some(FEED_NS))
}

/// Extract every control and enhancement under `root`, in document order
pub(crate) fn walk_controls(root: Node<'_, '_>) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for control in root.descendants().filter(|n| is_field(n, "control")) {
        let mut base = extract_entry(control, None);

        for container in control.children().filter(|n| is_field(n, "control-enhancements")) {
            for enhancement in container.children().filter(|n| is_field(n, "control-enhancement")) {
                let entry = extract_entry(enhancement, Some(&base.number));
                base.enhancements.push(entry.number.clone());
                entries.push(entry);
            }
        }

        entries.push(base);
    }

    entries
}

fn extract_entry(node: Node<'_, '_>, parent: Option<&str>) -> CatalogEntry {
    let number = child_text(node, "number").unwrap_or_default();
    let family = child_text(node, "family");
    let title = child_text(node, "title");
    let priority = child_text(node, "priority");
    let statement = node
        .children()
        .find(|n| is_field(n, "statement"))
        .map(|s| {
            let mut out = String::new();
            render_statement(s, &mut out);
            out
        })
        .filter(|s| !s.is_empty());

    let guidance = node
        .children()
        .find(|n| is_field(n, "supplemental-guidance"))
        .map(extract_guidance)
        .unwrap_or_default();

    let baseline_impact = node
        .children()
        .filter(|n| is_field(n, "baseline-impact"))
        .map(field_text)
        .filter(|s| !s.is_empty())
        .collect();

    let withdrawn_into = node
        .children()
        .filter(|n| is_field(n, "withdrawn"))
        .flat_map(|w| w.descendants().filter(|n| is_field(n, "incorporated-into")))
        .map(field_text)
        .filter(|s| !s.is_empty())
        .collect();

    let mut missing_fields = Vec::new();
    if title.is_none() {
        missing_fields.push("title".to_string());
    }
    if statement.is_none() {
        missing_fields.push("statement".to_string());
    }
    if parent.is_none() && family.is_none() {
        missing_fields.push("family".to_string());
    }

    CatalogEntry {
        number,
        family,
        title,
        priority,
        statement,
        guidance,
        enhancements: Vec::new(),
        baseline_impact,
        parent: parent.map(str::to_string),
        withdrawn_into,
        missing_fields,
    }
}

fn extract_guidance(node: Node<'_, '_>) -> SupplementalGuidance {
    SupplementalGuidance {
        description: child_text(node, "description").unwrap_or_default(),
        related: node
            .children()
            .filter(|n| is_field(n, "related"))
            .map(field_text)
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// Trimmed text of the first child element named `name`; empty text is absent
fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| is_field(n, name))
        .map(field_text)
        .filter(|s| !s.is_empty())
}

/// All text beneath `node` with wrapped lines joined by single spaces
fn field_text(node: Node<'_, '_>) -> String {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    normalize_lines(&raw)
}

fn normalize_lines(raw: &str) -> String {
    raw.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Depth-first append of every text node in document order.
///
/// Inline markup (`xhtml:em`, `xhtml:b`, ...) contributes its text with no
/// separator of its own.
pub(crate) fn collect_text(node: Node<'_, '_>, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            if let Some(text) = child.text() {
                out.push_str(text);
            }
        } else if child.is_element() {
            collect_text(child, out);
        }
    }
}

/// Render a statement sub-tree in reading order.
///
/// `number` and `description` of one level share a line, joined by a single
/// space; every nested statement starts a new tab-indented line. Loose text
/// and inline markup between them are gathered as written, so markup adds no
/// separator of its own.
fn render_statement(node: Node<'_, '_>, out: &mut String) {
    let mut loose = String::new();
    for child in node.children() {
        if is_field(&child, "statement") {
            push_inline(out, &normalize_lines(&loose));
            loose.clear();
            out.push_str("\n\t");
            render_statement(child, out);
        } else if is_field(&child, "number") || is_field(&child, "description") {
            push_inline(out, &normalize_lines(&loose));
            loose.clear();
            push_inline(out, &field_text(child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                loose.push_str(text);
            }
        } else if child.is_element() {
            collect_text(child, &mut loose);
        }
    }
    push_inline(out, &normalize_lines(&loose));
}

fn push_inline(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !(out.is_empty() || out.ends_with('\n') || out.ends_with('\t')) {
        out.push(' ');
    }
    out.push_str(text);
}
