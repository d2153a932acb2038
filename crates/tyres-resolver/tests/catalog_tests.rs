use super::*;
use tyres_format::ShortNameFormatter;
use tyres_types::{ModuleBuilder, ModuleRegistry, TypeDef};

fn order_in(store: &TypeStore, namespace: &str) -> TypeId {
    store
        .define(TypeDef::class("Order").in_namespace(namespace))
        .expect("order defined")
}

#[test]
fn test_generic_arity_distinguishes_keys() {
    let store = TypeStore::new();
    let one = store
        .define(TypeDef::class("Box").generic(1).in_namespace("Shop"))
        .expect("box`1");
    let two = store
        .define(TypeDef::class("Box").generic(2).in_namespace("Shop"))
        .expect("box`2");

    let mapping = create_mapping(&store, &[one, two], &ShortNameFormatter, false).expect("built");
    assert_eq!(mapping.get("Box<>"), Some(&one));
    assert_eq!(mapping.get("Box<,>"), Some(&two));
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_collision_moves_both_to_unique_names() {
    let store = TypeStore::new();
    let shop = order_in(&store, "Shop");
    let billing = order_in(&store, "Billing");

    let mapping =
        create_mapping(&store, &[shop, billing], &ShortNameFormatter, false).expect("built");
    assert!(!mapping.contains_key("Order"));
    assert_eq!(mapping.get("Shop.Order"), Some(&shop));
    assert_eq!(mapping.get("Billing.Order"), Some(&billing));
}

#[test]
fn test_collided_key_stays_unclaimed() {
    let store = TypeStore::new();
    let shop = order_in(&store, "Shop");
    let billing = order_in(&store, "Billing");
    let audit = order_in(&store, "Audit");

    let mapping = create_mapping(&store, &[shop, billing, audit], &ShortNameFormatter, false)
        .expect("built");
    assert!(!mapping.contains_key("Order"));
    assert_eq!(mapping.get("Audit.Order"), Some(&audit));
    assert_eq!(mapping.len(), 3);
}

#[test]
fn test_same_type_twice_is_noop() {
    let store = TypeStore::new();
    let shop = order_in(&store, "Shop");

    let mapping = create_mapping(&store, &[shop, shop], &ShortNameFormatter, false).expect("built");
    assert_eq!(mapping.get("Order"), Some(&shop));
    assert_eq!(mapping.len(), 1);
}

#[test]
fn test_true_duplicates_are_dropped_in_lenient_mode() {
    let store = TypeStore::new();
    let first = order_in(&store, "Shop");
    let second = order_in(&store, "Shop");
    let other = store
        .define(TypeDef::class("Invoice").in_namespace("Shop"))
        .expect("invoice");

    let mapping = create_mapping(&store, &[first, second, other], &ShortNameFormatter, false)
        .expect("lenient mode never fails");
    assert!(!mapping.contains_key("Order"));
    assert!(!mapping.contains_key("Shop.Order"));
    assert_eq!(mapping.get("Invoice"), Some(&other));

    let third = order_in(&store, "Shop");
    let mapping = create_mapping(&store, &[first, second, third], &ShortNameFormatter, false)
        .expect("lenient mode never fails");
    assert!(mapping.is_empty());
}

#[test]
fn test_true_duplicates_fail_in_strict_mode() {
    let store = TypeStore::new();
    let first = order_in(&store, "Shop");
    let second = order_in(&store, "Shop");

    let err = create_mapping(&store, &[first, second], &ShortNameFormatter, true)
        .expect_err("strict mode");
    match err {
        ResolverError::NameConflict {
            name,
            first: a,
            second: b,
        } => {
            assert_eq!(name, "Shop.Order");
            assert_eq!((a, b), (first, second));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_strict_mode_accepts_resolvable_collisions() {
    let store = TypeStore::new();
    let shop = order_in(&store, "Shop");
    let billing = order_in(&store, "Billing");

    let mapping = create_mapping(&store, &[shop, billing], &ShortNameFormatter, true)
        .expect("unique names differ");
    assert_eq!(mapping.len(), 2);
}

#[test]
fn test_full_index_uses_namespaced_keys() {
    let store = TypeStore::new();
    let shop = order_in(&store, "Shop");
    let billing = order_in(&store, "Billing");

    let catalog = TypeCatalog::from_types(&store, &[shop, billing], &ShortNameFormatter, false)
        .expect("built");
    assert_eq!(catalog.get_full("Shop.Order"), Some(shop));
    assert_eq!(catalog.get_full("Billing.Order"), Some(billing));
    assert_eq!(catalog.get_full("Order"), None);
    assert_eq!(catalog.full().len(), 2);
    assert_eq!(catalog.scanned_types(), 2);
}

#[test]
fn test_build_scans_registered_modules() {
    let store = TypeStore::new();
    let mut builder = ModuleBuilder::new(&store, "Shop").namespace("Shop");
    let outer = builder
        .define(TypeDef::class("Outer").generic(1))
        .expect("outer");
    let inner = builder
        .define(TypeDef::class("Inner").generic(1).nested_in(outer))
        .expect("inner");

    let registry = ModuleRegistry::with_builtins(&store);
    registry.register(builder.build());

    let catalog = TypeCatalog::build(&store, &registry, &ResolverOptions::default())
        .expect("built");
    assert_eq!(catalog.get("Outer<>"), Some(outer));
    assert_eq!(catalog.get("Outer<>.Inner<>"), Some(inner));
    assert_eq!(catalog.get_full("Shop.Outer<>.Inner<>"), Some(inner));
    assert!(catalog.get("Int32").is_some());
    assert!(catalog.get_full("System.Collections.Generic.Dictionary<,>").is_some());
}
