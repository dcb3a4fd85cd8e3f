//! Dependency ordering tests
//!
//! Ordering observed through a full scan, including cycle handling and strict mode.

use super::test_utils::*;

use bllvm_module_loader::module::registry::ModuleDependencies;
use bllvm_module_loader::{ModuleDescriptor, ModuleError};

#[tokio::test]
async fn test_serial_load_follows_dependency_order() {
    let mut fixture = ModuleTestFixture::new().unwrap();
    fixture.add_module(
        "app.module.ts",
        ModuleDescriptor::new("app").depends_on("users").with_weight(-10),
        Behavior::ForRoot,
    );
    fixture.add_module(
        "database.module.ts",
        ModuleDescriptor::new("database").with_weight(100),
        Behavior::ForRoot,
    );
    fixture.add_module(
        "users.module.ts",
        ModuleDescriptor::new("users").depends_on("database"),
        Behavior::Register,
    );
    fixture.add_module(
        "health.module.ts",
        ModuleDescriptor::new("health").with_weight(5),
        Behavior::ForRoot,
    );

    let mut manager = fixture.manager();
    let results = manager
        .scan_and_load(&fixture.options().parallel(false))
        .await
        .unwrap();

    assert_eq!(
        result_names(&results),
        vec!["database", "users", "app", "health"]
    );
    assert_eq!(fixture.log.order(), vec!["database", "users", "app", "health"]);
    assert!(results.iter().all(|r| r.loaded));
}

#[tokio::test]
async fn test_cycle_aborts_before_instantiation() {
    let mut fixture = ModuleTestFixture::new().unwrap();
    fixture.add_module(
        "a.module.ts",
        ModuleDescriptor::new("A").depends_on("B"),
        Behavior::ForRoot,
    );
    fixture.add_module(
        "b.module.ts",
        ModuleDescriptor::new("B").depends_on("A"),
        Behavior::ForRoot,
    );
    fixture.add_module("c.module.ts", ModuleDescriptor::new("C"), Behavior::ForRoot);

    let mut manager = fixture.manager();
    let err = manager.scan_and_load(&fixture.options()).await.unwrap_err();

    match err {
        ModuleError::CircularDependency(name) => assert!(name == "A" || name == "B"),
        other => panic!("expected a cycle error, got {:?}", other),
    }
    assert_eq!(fixture.log.calls(), 0);
    assert!(manager.loaded_modules().is_empty());
}

#[tokio::test]
async fn test_missing_dependency_permissive_and_strict() {
    let mut fixture = ModuleTestFixture::new().unwrap();
    fixture.add_module(
        "orders.module.ts",
        ModuleDescriptor::new("orders").depends_on("payments"),
        Behavior::ForRoot,
    );

    let mut manager = fixture.manager();
    let results = manager.scan_and_load(&fixture.options()).await.unwrap();
    assert_eq!(result_names(&results), vec!["orders"]);
    assert!(results[0].loaded);

    let err = manager
        .scan_and_load(&fixture.options().strict(true))
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::DependencyMissing(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_duplicate_names_permissive_and_strict() {
    let mut fixture = ModuleTestFixture::new().unwrap();
    fixture.add_module(
        "a/cache.module.ts",
        ModuleDescriptor::new("cache").with_weight(1),
        Behavior::Direct,
    );
    fixture.add_module(
        "b/cache.module.ts",
        ModuleDescriptor::new("cache").with_weight(2),
        Behavior::Direct,
    );

    let mut manager = fixture.manager();
    let results = manager.scan_and_load(&fixture.options()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(manager.module_registry()["cache"].weight, 2);

    let err = manager
        .scan_and_load(&fixture.options().strict(true))
        .await
        .unwrap_err();
    assert!(matches!(err, ModuleError::DuplicateModule(_)));
}

#[test]
fn test_weight_is_only_a_tiebreak() {
    let input = vec![
        ModuleDescriptor::new("late").with_weight(30),
        ModuleDescriptor::new("early").with_weight(10),
        ModuleDescriptor::new("middle").with_weight(20),
        ModuleDescriptor::new("needs-late").depends_on("late"),
    ];
    let order = ModuleDependencies::order(&input).unwrap();
    let names: Vec<_> = order.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["late", "needs-late", "early", "middle"]);
}
