//! Discovery tests
//!
//! Directory scanning, include/exclude globs and extraction from scanned files.

use super::test_utils::*;

use bllvm_module_loader::module::registry::{
    matches, scan, LoadedResource, ModuleDiscovery, ModuleRegistry, MetadataExtractor,
    SuffixIdentifier,
};
use bllvm_module_loader::module::registry::Export;
use bllvm_module_loader::{LoaderOptions, ModuleDescriptor};
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_scan_filters_spec_files() {
    let fixture = ModuleTestFixture::new().unwrap();
    fixture.touch("foo.module.ts");
    fixture.touch("foo.spec.ts");
    fixture.touch("bar.module.ts");

    let found = scan(
        &fixture.modules_dir,
        &["**/*.module.{ts,js}"],
        &["**/*.spec.{ts,js}"],
        true,
    )
    .unwrap();

    let mut relative = fixture.relative(&found);
    relative.sort();
    assert_eq!(relative, vec!["bar.module.ts", "foo.module.ts"]);
    assert!(found.iter().all(|p| p.is_absolute()));
}

#[test]
fn test_recursive_flag() {
    let fixture = ModuleTestFixture::new().unwrap();
    fixture.touch("top.module.ts");
    fixture.touch("features/users/users.module.ts");
    fixture.touch("features/users/deep/audit.module.js");

    let nested = scan(&fixture.modules_dir, &["**/*.module.{ts,js}"], &[], true).unwrap();
    assert_eq!(
        fixture.relative(&nested),
        vec![
            "features/users/deep/audit.module.js",
            "features/users/users.module.ts",
            "top.module.ts",
        ]
    );

    let flat = scan(&fixture.modules_dir, &["**/*.module.{ts,js}"], &[], false).unwrap();
    assert_eq!(fixture.relative(&flat), vec!["top.module.ts"]);
}

#[test]
fn test_default_options_exclude_tests_and_vendored_trees() {
    let fixture = ModuleTestFixture::new().unwrap();
    fixture.touch("billing.module.ts");
    fixture.touch("billing.test.ts");
    fixture.touch("wallet.module.toml");
    fixture.touch("node_modules/pkg/vendored.module.js");
    fixture.touch("target/debug/built.module.toml");
    fixture.touch("README.md");

    let discovery = ModuleDiscovery::from_options(&fixture.options()).unwrap();
    let found = discovery.discover();
    assert_eq!(
        fixture.relative(&found),
        vec!["billing.module.ts", "wallet.module.toml"]
    );
}

#[test]
fn test_missing_base_path_yields_nothing() {
    let fixture = ModuleTestFixture::new().unwrap();
    let missing = fixture.temp_dir.path().join("does-not-exist");
    let found = scan(&missing, &["**/*"], &[], true).unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_relative_base_path_is_made_absolute() {
    let discovery = ModuleDiscovery::from_options(&LoaderOptions::new("relative/modules")).unwrap();
    assert!(discovery.base_path().is_absolute());
    assert!(discovery.base_path().ends_with(Path::new("relative").join("modules")));
}

#[test]
fn test_pattern_subset() {
    assert!(matches("a.module.ts", "**/*.module.{ts,js}"));
    assert!(matches("x/y/a.module.js", "**/*.module.{ts,js}"));
    assert!(!matches("x/a.module.ts", "*.module.ts"));
    assert!(matches("a1.ts", "a?.ts"));
    assert!(!matches("a12.ts", "a?.ts"));
    assert!(!matches("amodule.ts", "a.module.ts"));
    assert!(!matches("a.module.tsx", "**/*.module.ts"));
}

#[tokio::test]
async fn test_extraction_skips_non_modules() {
    let mut fixture = ModuleTestFixture::new().unwrap();
    fixture.add_module("users.module.ts", ModuleDescriptor::new("users"), Behavior::Direct);
    fixture.add_resource(
        "helpers.module.ts",
        LoadedResource::empty()
            .export("formatDate", Export::Value(serde_json::json!("fn")))
            .export("helpers", Export::Definition(Arc::new(Helper))),
    );
    fixture.add_resource(
        "named.module.ts",
        LoadedResource::empty().export(
            "AuditModule",
            Export::Definition(Arc::new(ScriptedModule {
                descriptor: ModuleDescriptor::new("audit"),
                behavior: Behavior::Direct,
                log: fixture.log.clone(),
            })),
        ),
    );

    let paths = scan(&fixture.modules_dir, &["**/*.module.ts"], &[], true).unwrap();
    assert_eq!(paths.len(), 3);

    let catalog = fixture.catalog();
    let identifier = SuffixIdentifier::default();
    let mut registry = ModuleRegistry::new();
    let descriptors = MetadataExtractor::new(&catalog, &identifier)
        .extract(&paths, None, &mut registry)
        .await
        .unwrap();

    let names: Vec<_> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["audit", "users"]);
    assert_eq!(registry.len(), 2);
    assert!(registry
        .get("audit")
        .unwrap()
        .source_path
        .ends_with("named.module.ts"));
}
