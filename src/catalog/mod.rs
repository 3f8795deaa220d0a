//! NIST SP 800-53 Control Catalog
//!
//! Loads the NIST 800-53 XML control feed and normalizes individual
//! controls and control enhancements into [`ControlRecord`]s.
//!
//! # Usage
//!
//! ```ignore
//! use compliancekit::catalog::{ControlCatalog, Responsible};
//!
//! let catalog = ControlCatalog::from_file("data/800-53-controls.xml")?;
//! let record = catalog.lookup("AC-2");
//!
//! assert_eq!(record.responsible, Some(Responsible::Organization));
//! for section in &record.description_sections {
//!     println!("  {}", section);
//! }
//! ```
//!
//! # Feed Shape
//!
//! Each `controls:control` element carries `number`, `family`, `title`,
//! `priority`, a `statement` sub-tree (which may nest further statements
//! and inline XHTML markup), `supplemental-guidance` with `description`
//! and `related` entries, and optionally `control-enhancements`.

mod feed;
mod loader;
mod record;
mod text;

pub use feed::{CONTROL_NS, FEED_NS};
pub use loader::{CatalogError, ControlCatalog};
pub use record::{is_enhancement_id, ControlRecord, Responsible, SupplementalGuidance};
pub use text::{replace_line_breaks, split_description};
