//! End-to-end system profiles over the fixture catalog and components

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use serde_json::json;

use compliancekit::component::MemoryFetcher;
use compliancekit::{
    CollectionKind, ComplianceProfile, ComponentStore, ControlCatalog, DefaultFetcher,
    ImplementationStatus, IngestError, ProfileConfig, ProfileError, Summary,
};

const UAA: &str = "User Account and Authentication (UAA) Server";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path).unwrap().to_string()
}

fn catalog() -> Arc<ControlCatalog> {
    Arc::new(ControlCatalog::from_file(fixture("800-53-controls.xml")).unwrap())
}

/// Profile with both fixture components registered, UAA first
fn dashboard_profile() -> ComplianceProfile {
    let mut profile = ComplianceProfile::new(catalog());
    profile.set_name("GovReady WordPress Dashboard");
    for name in ["UAA_component.yaml", "AU_policy_component.yaml"] {
        profile
            .add_component_from_location(&file_url(&fixture(name)))
            .unwrap();
    }
    profile
        .add_dict_entry("standards", "FRIST-800-53", json!({"name": "FRIST-800-53", "other_key": "some value"}))
        .unwrap();
    profile
        .add_dict_entry("certifications", "FRed-RAMP-Low", json!({"name": "FRed-RAMP-Low", "other_key": "some value"}))
        .unwrap();
    profile
}

#[test]
fn loading_the_same_location_twice_is_a_no_op() {
    let mut store = ComponentStore::new();
    let location = file_url(&fixture("UAA_component.yaml"));

    let first = store.load(&location).unwrap();
    let second = store.load(&location).unwrap();

    assert_eq!(store.count(), 1);
    assert_eq!(first, second);
    assert_eq!(first.satisfies.len(), 26);
}

#[test]
fn path_and_file_url_spellings_are_one_source() {
    let mut store = ComponentStore::new();
    let path = fixture("AU_policy_component.yaml");

    store.load(&path.to_string_lossy()).unwrap();
    store.load(&file_url(&path)).unwrap();

    assert_eq!(store.count(), 1);
}

#[test]
fn distinct_locations_are_retrievable_by_source_key() {
    let mut store = ComponentStore::new();
    let uaa = file_url(&fixture("UAA_component.yaml"));
    let audit = file_url(&fixture("AU_policy_component.yaml"));

    store.load(&uaa).unwrap();
    store.load(&audit).unwrap();

    assert_eq!(store.count(), 2);
    assert_eq!(store.get(&uaa).unwrap().name, UAA);
    assert_eq!(store.get(&audit).unwrap().name, "Audit Policy");
    assert_eq!(store.get(&audit).unwrap().source.as_deref(), Some(audit.as_str()));
}

#[test]
fn failed_load_leaves_store_untouched() {
    let mut store = ComponentStore::new();
    let uaa = file_url(&fixture("UAA_component.yaml"));
    store.load(&uaa).unwrap();

    let missing = fixture("no_such_component.yaml");
    let err = store.load(&missing.to_string_lossy()).unwrap_err();
    assert!(matches!(err, IngestError::Fetch { .. }));
    assert!(err.location().ends_with("no_such_component.yaml"));

    // XML is not a component declaration
    let err = store.load(&fixture("800-53-controls.xml").to_string_lossy()).unwrap_err();
    assert!(matches!(err, IngestError::Parse { .. }));

    assert_eq!(store.count(), 1);
    assert_eq!(store.source_keys(), vec![uaa.as_str()]);
}

#[test]
fn components_are_listed_sorted() {
    let profile = dashboard_profile();
    assert_eq!(profile.components(), vec!["Audit Policy", UAA]);
    assert_eq!(
        profile.store().component(UAA).unwrap().satisfies.len(),
        26
    );
}

#[test]
fn summary_of_the_dashboard_system() {
    let profile = dashboard_profile();
    assert_eq!(
        profile.summary(),
        Summary {
            name: "GovReady WordPress Dashboard".to_string(),
            components: vec!["Audit Policy".to_string(), UAA.to_string()],
            standards: vec!["FRIST-800-53".to_string()],
            certifications: vec!["FRed-RAMP-Low".to_string()],
        }
    );
}

#[test]
fn unknown_collection_kind_is_rejected() {
    let mut profile = dashboard_profile();
    let err = profile.add_dict_entry("bogus", "X", json!({})).unwrap_err();
    assert!(matches!(err, ProfileError::UnknownCollection { .. }));
    assert_eq!(profile.standards(), vec!["FRIST-800-53"]);
    assert!(profile.roles().is_empty());
}

#[test]
fn control_view_lists_components_in_registration_order() {
    let profile = dashboard_profile();
    let view = profile.control("AC-4");

    assert!(view.is_found());
    assert_eq!(view.id(), "AC-4");
    assert_eq!(view.title(), Some("INFORMATION FLOW ENFORCEMENT"));
    assert_eq!(view.components, vec![UAA, "Audit Policy"]);
    assert_eq!(
        view.narrative,
        vec![
            "UAA enforces OAuth2 scopes on every token it issues, so resource servers only accept information flows the token's scopes authorize.",
            "Audit records capture every cross-boundary information flow decision.",
        ]
    );
    assert_eq!(
        view.implementation_status,
        vec![ImplementationStatus::Partial, ImplementationStatus::Planned]
    );
}

#[test]
fn keyed_narrative_parts_are_flattened() {
    let profile = dashboard_profile();
    let view = profile.control("AU-1");

    assert_eq!(view.components, vec!["Audit Policy"]);
    assert_eq!(
        view.narrative,
        vec!["a: The agency audit policy is published on the intranet and disseminated\nto all system owners.\nb: The policy is reviewed annually by the ISSO."]
    );
}

#[test]
fn enhancement_view_uses_enhancement_record() {
    let profile = dashboard_profile();
    let enhancement = profile.control("AC-2 (1)");
    let base = profile.control("AC-2");

    assert!(enhancement.is_found());
    assert_eq!(enhancement.title(), Some("AUTOMATED SYSTEM ACCOUNT MANAGEMENT"));
    assert_ne!(enhancement.title(), base.title());
    assert_ne!(enhancement.control.description_intro, base.control.description_intro);
    assert_eq!(enhancement.components, vec![UAA]);
    assert_eq!(
        enhancement.narrative,
        vec!["UAA provides automated account management through its SCIM API."]
    );
}

#[test]
fn unknown_control_view() {
    let profile = dashboard_profile();
    let view = profile.control("AC-200");

    assert!(!view.is_found());
    assert_eq!(view.title(), None);
    assert!(view.components.is_empty());
    assert!(view.narrative.is_empty());

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["found"], false);
    assert_eq!(json["components"], json!([]));
}

#[test]
fn name_collision_is_last_write_wins() {
    let fetcher = MemoryFetcher::new()
        .with_document("https://example.org/v1/component.yaml", "name: Gateway\nsatisfies:\n  - control_key: AC-4\n    narrative: v1\n")
        .with_document("https://example.org/v2/component.yaml", "name: Gateway\nsatisfies:\n  - control_key: SC-7\n    narrative: v2\n");
    let store = ComponentStore::with_fetcher(Box::new(fetcher));
    let mut profile = ComplianceProfile::with_store(catalog(), store);

    profile.add_component_from_location("https://example.org/v1/component.yaml").unwrap();
    profile.add_component_from_location("https://example.org/v2/component.yaml").unwrap();

    assert_eq!(profile.store().count(), 2);
    assert_eq!(profile.components(), vec!["Gateway"]);
    assert!(profile.control("AC-4").components.is_empty());
    assert_eq!(profile.control("SC-7").narrative, vec!["v2"]);
}

#[test]
fn batch_load_reports_every_failure() {
    let fetcher = Rc::new(MemoryFetcher::new().with_document(
        "https://example.org/audit.yaml",
        std::fs::read(fixture("AU_policy_component.yaml")).unwrap(),
    ));
    let store = ComponentStore::with_fetcher(Box::new(fetcher.clone()));
    let mut profile = ComplianceProfile::with_store(catalog(), store);

    let err = profile
        .add_components_from_locations([
            "https://example.org/missing-1.yaml",
            "https://example.org/audit.yaml",
            "ftp://example.org/unsupported.yaml",
            "https://example.org/missing-2.yaml",
        ])
        .unwrap_err();

    let locations: Vec<&str> = err.failures.iter().map(IngestError::location).collect();
    assert_eq!(locations.len(), 3);
    assert!(locations[0].ends_with("missing-1.yaml"));
    assert!(locations[2].ends_with("missing-2.yaml"));
    assert!(matches!(err.failures[1], IngestError::InvalidLocation { .. }));
    assert_eq!(profile.components(), vec!["Audit Policy"]);
    // the unsupported scheme is rejected before any fetch
    assert_eq!(fetcher.fetch_count(), 3);
}

#[test]
fn profile_from_configuration_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("800-53-controls.xml"), dir.path().join("controls.xml")).unwrap();
    std::fs::create_dir(dir.path().join("components")).unwrap();
    std::fs::copy(fixture("UAA_component.yaml"), dir.path().join("components/uaa.yaml")).unwrap();
    let audit_url = file_url(&fixture("AU_policy_component.yaml"));

    let config_path = dir.path().join("compliancekit.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[system]
name = "GovReady WordPress Dashboard"

[catalog]
path = "controls.xml"

[components]
locations = ["components/uaa.yaml", "{audit_url}"]

[standards."FRIST-800-53"]
other_key = "some value"

[certifications."FRed-RAMP-Low"]
other_key = "some value"
"#
        ),
    )
    .unwrap();

    let build = ProfileConfig::from_file(&config_path)
        .unwrap()
        .build_with(Box::new(DefaultFetcher::new()))
        .unwrap();

    assert!(build.failures.is_empty());
    assert_eq!(build.profile.summary(), dashboard_profile().summary());
    assert_eq!(
        build.profile.entry(CollectionKind::Standards, "FRIST-800-53").unwrap(),
        Some(json!({"other_key": "some value"}))
    );
    assert_eq!(
        build.profile.control("AC-4").components,
        vec![UAA, "Audit Policy"]
    );
}

#[test]
fn profiles_share_one_catalog_without_interfering() {
    let shared = catalog();
    let mut first = ComplianceProfile::new(shared.clone());
    let second = ComplianceProfile::new(shared.clone());

    first
        .add_component_from_location(&file_url(&fixture("AU_policy_component.yaml")))
        .unwrap();

    assert_eq!(first.control("AU-1").components, vec!["Audit Policy"]);
    assert!(second.control("AU-1").components.is_empty());
    assert_eq!(first.control("AU-1").control, second.control("AU-1").control);
}
