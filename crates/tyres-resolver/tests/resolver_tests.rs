use super::*;
use std::sync::atomic::AtomicUsize;
use tyres_format::ShortNameFormatter;
use tyres_types::{
    ExportedTypes, ModuleBuilder, ModuleRegistry, ScanError, StaticModule, TypeDef, TypeModule,
};

/// Counts how often its types are enumerated.
struct CountingModule {
    inner: StaticModule,
    scans: Arc<AtomicUsize>,
}

impl TypeModule for CountingModule {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn exported_types(&self) -> Result<ExportedTypes<'_>, ScanError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.inner.exported_types()
    }
}

struct Shop {
    store: Arc<TypeStore>,
    modules: Arc<ModuleRegistry>,
    scans: Arc<AtomicUsize>,
    box1: TypeId,
    box2: TypeId,
    outer: TypeId,
    inner: TypeId,
    leaf: TypeId,
    deep: TypeId,
    shop_order: TypeId,
    billing_order: TypeId,
    wrapper: TypeId,
}

fn shop() -> Shop {
    let store = Arc::new(TypeStore::new());
    let mut shop = ModuleBuilder::new(&store, "Shop.Contracts").namespace("Shop");
    let box1 = shop.define(TypeDef::class("Box").generic(1)).expect("box`1");
    let box2 = shop.define(TypeDef::class("Box").generic(2)).expect("box`2");
    let outer = shop.define(TypeDef::class("Outer").generic(1)).expect("outer");
    let inner = shop
        .define(TypeDef::class("Inner").generic(1).nested_in(outer))
        .expect("inner");
    let leaf = shop
        .define(TypeDef::class("Leaf").nested_in(outer))
        .expect("leaf");
    let deep = shop
        .define(TypeDef::class("Deep").nested_in(inner))
        .expect("deep");
    let shop_order = shop.define(TypeDef::class("Order")).expect("order");
    let wrapper = shop
        .define(
            TypeDef::structure("Wrapper")
                .with_constraints(vec![tyres_types::GenericConstraint::ValueType]),
        )
        .expect("wrapper");

    let mut billing = ModuleBuilder::new(&store, "Billing.Contracts").namespace("Billing");
    let billing_order = billing.define(TypeDef::class("Order")).expect("order");

    let scans = Arc::new(AtomicUsize::new(0));
    let modules = ModuleRegistry::with_builtins(&store);
    modules.register(CountingModule {
        inner: shop.build(),
        scans: Arc::clone(&scans),
    });
    modules.register(billing.build());

    Shop {
        store,
        modules: Arc::new(modules),
        scans,
        box1,
        box2,
        outer,
        inner,
        leaf,
        deep,
        shop_order,
        billing_order,
        wrapper,
    }
}

impl Shop {
    fn resolver(&self) -> TypeResolver {
        TypeResolver::new(Arc::clone(&self.store), self.modules.clone())
    }

    fn alias(&self, keyword: &str) -> TypeId {
        self.store.alias(keyword).expect("keyword alias")
    }

    fn close(&self, definition: TypeId, args: &[TypeId]) -> TypeId {
        self.store.make_generic(definition, args).expect("closed")
    }
}

fn resolve(resolver: &TypeResolver, name: &str) -> Option<TypeId> {
    resolver.resolve(name).expect("no fatal error")
}

// =============================================================================
// Lookup layers
// =============================================================================

#[test]
fn test_keyword_resolves_without_scan() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(resolve(&resolver, "int"), Some(shop.alias("int")));
    assert_eq!(resolve(&resolver, " string "), Some(shop.alias("string")));
    assert!(!resolver.is_realized());
    assert_eq!(shop.scans.load(Ordering::SeqCst), 0);
}

#[test]
fn test_framework_names_resolve_through_catalog() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(resolve(&resolver, "Int32"), Some(shop.alias("int")));
    assert_eq!(resolve(&resolver, "System.Int32"), Some(shop.alias("int")));
    assert!(resolver.is_realized());
}

#[test]
fn test_unknown_and_malformed_names() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(resolve(&resolver, "Missing"), None);
    assert_eq!(resolve(&resolver, "Box<int"), None);
    assert_eq!(resolve(&resolver, ""), None);
    assert_eq!(resolve(&resolver, "Box<Missing>"), None);
    assert_eq!(resolve(&resolver, "Box<int,int,int>"), None);
}

// =============================================================================
// Generics
// =============================================================================

#[test]
fn test_generic_arity_selects_definition() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");
    let string = shop.alias("string");

    let one = resolve(&resolver, "Box<int>").expect("Box<int>");
    assert_eq!(one, shop.close(shop.box1, &[int]));
    assert_eq!(resolver.display_name(one, NamingStrategy::Short), "Box<Int32>");

    let two = resolve(&resolver, "Box<int, string>").expect("Box<int,string>");
    assert_eq!(two, shop.close(shop.box2, &[int, string]));

    assert_eq!(resolve(&resolver, "Box<>"), Some(shop.box1));
    assert_eq!(resolve(&resolver, "Box<,>"), Some(shop.box2));
}

#[test]
fn test_generic_arguments_resolve_recursively() {
    let shop = shop();
    let resolver = shop.resolver();

    let id = resolve(&resolver, "Box<List<Box<long>>>").expect("resolved");
    assert_eq!(
        resolver.display_name(id, NamingStrategy::Short),
        "Box<List<Box<Int64>>>"
    );
    assert_eq!(
        resolver.display_name(id, NamingStrategy::Full),
        "Shop.Box<System.Collections.Generic.List<Shop.Box<System.Int64>>>"
    );
}

#[test]
fn test_constraint_violation_is_not_found() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(
        resolve(&resolver, "Wrapper<int>"),
        Some(shop.close(shop.wrapper, &[shop.alias("int")]))
    );
    assert_eq!(resolve(&resolver, "Wrapper<string>"), None);
    assert_eq!(resolve(&resolver, "Nullable<object>"), None);
}

// =============================================================================
// Nested types
// =============================================================================

#[test]
fn test_nested_generic_type() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");
    let string = shop.alias("string");

    let id = resolve(&resolver, "Outer<int>.Inner<string>").expect("resolved");
    assert_eq!(id, shop.close(shop.inner, &[int, string]));
    assert_eq!(
        resolver.display_name(id, NamingStrategy::Short),
        "Outer<Int32>.Inner<String>"
    );
}

#[test]
fn test_non_generic_nested_types() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");
    let string = shop.alias("string");

    assert_eq!(
        resolve(&resolver, "Outer<int>.Leaf"),
        Some(shop.close(shop.leaf, &[int]))
    );
    assert_eq!(
        resolve(&resolver, "Outer<int>.Inner<string>.Deep"),
        Some(shop.close(shop.deep, &[int, string]))
    );
    assert_eq!(resolve(&resolver, "Outer<int>.Missing"), None);
    assert_eq!(resolve(&resolver, "Outer<int>.Leaf<int>"), None);
}

#[test]
fn test_open_nested_definitions() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(resolve(&resolver, "Outer<>.Inner<>"), Some(shop.inner));
    assert_eq!(resolve(&resolver, "Outer<>.Leaf"), Some(shop.leaf));
    assert_eq!(resolve(&resolver, "Outer<>.Inner<>.Deep"), Some(shop.deep));
    assert_eq!(resolve(&resolver, "Outer<>.Inner<int>"), None);
    assert_eq!(resolve(&resolver, "Outer<int>.Inner<>"), None);
}

#[test]
fn test_formatted_names_round_trip() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");
    let string = shop.alias("string");

    let closed = [
        shop.close(shop.box1, &[int]),
        shop.close(shop.box2, &[string, int]),
        shop.close(shop.inner, &[int, string]),
        shop.close(shop.leaf, &[string]),
        shop.close(shop.deep, &[int, int]),
    ];
    let definitions = [shop.box1, shop.box2, shop.outer, shop.inner, shop.leaf, shop.deep];

    for id in closed.into_iter().chain(definitions) {
        for strategy in [NamingStrategy::Short, NamingStrategy::Full] {
            let name = resolver.display_name(id, strategy);
            assert_eq!(resolve(&resolver, &name), Some(id), "{name}");
        }
    }
}

// =============================================================================
// Collisions
// =============================================================================

#[test]
fn test_colliding_short_names_resolve_by_full_name() {
    let shop = shop();
    let resolver = shop.resolver();

    assert_eq!(resolve(&resolver, "Order"), None);
    assert_eq!(resolve(&resolver, "Shop.Order"), Some(shop.shop_order));
    assert_eq!(resolve(&resolver, "Billing.Order"), Some(shop.billing_order));
}

#[test]
fn test_strict_mode_conflict_is_fatal_and_cached() {
    let store = Arc::new(TypeStore::new());
    let mut first = ModuleBuilder::new(&store, "First").namespace("Shop");
    first.define(TypeDef::class("Order")).expect("order");
    let mut second = ModuleBuilder::new(&store, "Second").namespace("Shop");
    second.define(TypeDef::class("Order")).expect("order");

    let modules = ModuleRegistry::new();
    modules.register(first.build());
    modules.register(second.build());
    let resolver = TypeResolver::new(Arc::clone(&store), Arc::new(modules));
    resolver
        .configure(|options| {
            options.fail_on_name_conflicts(true);
        })
        .expect("configured");

    // Keyword aliases never touch the catalog.
    assert_eq!(
        resolver.resolve("int").expect("alias"),
        store.alias("int")
    );
    for _ in 0..2 {
        let err = resolver.resolve("Invoice").expect_err("conflict");
        assert!(matches!(err, ResolverError::NameConflict { ref name, .. } if name == "Shop.Order"));
    }
}

#[test]
fn test_lenient_mode_drops_true_duplicates() {
    let store = Arc::new(TypeStore::new());
    let mut first = ModuleBuilder::new(&store, "First").namespace("Shop");
    first.define(TypeDef::class("Order")).expect("order");
    let mut second = ModuleBuilder::new(&store, "Second").namespace("Shop");
    second.define(TypeDef::class("Order")).expect("order");

    let modules = ModuleRegistry::new();
    modules.register(first.build());
    modules.register(second.build());
    let resolver = TypeResolver::new(Arc::clone(&store), Arc::new(modules));

    assert_eq!(resolve(&resolver, "Order"), None);
    assert_eq!(resolve(&resolver, "Shop.Order"), None);
}

// =============================================================================
// Full-name resolution
// =============================================================================

#[test]
fn test_resolve_by_full_name_skips_primary_index() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");

    assert_eq!(
        resolver.resolve_by_full_name("Shop.Box<int>").expect("no fatal error"),
        Some(shop.close(shop.box1, &[int]))
    );
    assert_eq!(
        resolver
            .resolve_by_full_name("Shop.Outer<System.Int32>.Leaf")
            .expect("no fatal error"),
        Some(shop.close(shop.leaf, &[int]))
    );
    assert_eq!(
        resolver.resolve_by_full_name("Box<int>").expect("no fatal error"),
        None
    );
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_configure_before_first_use() {
    let shop = shop();
    let resolver = shop.resolver();
    resolver
        .configure(|options| {
            options
                .naming_strategy(NamingStrategy::Full)
                .exclude_modules(|name| name.starts_with("Billing"));
        })
        .expect("configured");

    assert_eq!(resolver.options().formatter.label(), "full");
    assert_eq!(resolve(&resolver, "Shop.Order"), Some(shop.shop_order));
    // The full index is also the primary one now; "Order" is not a full name.
    assert_eq!(resolve(&resolver, "Order"), None);
    assert_eq!(resolve(&resolver, "Billing.Order"), None);
}

#[test]
fn test_configure_after_realization_fails() {
    let shop = shop();
    let resolver = shop.resolver();
    resolve(&resolver, "Order");

    let err = resolver
        .configure(|options| {
            options.fail_on_name_conflicts(true);
        })
        .expect_err("already realized");
    assert!(matches!(err, ResolverError::AlreadyRealized));

    let err = resolver
        .configure_with(ResolverOptions::default(), |_| {})
        .expect_err("already realized");
    assert!(matches!(err, ResolverError::AlreadyRealized));
    assert!(!resolver.options().fail_on_name_conflicts);
}

#[test]
fn test_resolving_inside_configure_fails_fast() {
    let shop = shop();
    let resolver = Arc::new(shop.resolver());
    let (tx, rx) = std::sync::mpsc::channel();

    let worker = Arc::clone(&resolver);
    std::thread::spawn(move || {
        let result = worker.configure(|options| {
            let _ = worker.resolve("Order");
            options.fail_on_name_conflicts(true);
        });
        let _ = tx.send(result);
    });

    let result = rx
        .recv_timeout(std::time::Duration::from_secs(5))
        .expect("configure returned");
    assert!(matches!(result, Err(ResolverError::AlreadyRealized)));
    assert!(resolver.is_realized());
    assert!(!resolver.options().fail_on_name_conflicts);
    assert_eq!(resolve(&resolver, "Shop.Order"), Some(shop.shop_order));
}

#[test]
fn test_configure_with_keeps_base() {
    let shop = shop();
    let resolver = shop.resolver();
    let mut base = ResolverOptions::default();
    base.exclude_modules(|name| name == "Shop.Contracts");

    resolver
        .configure_with(base, |options| {
            options.fail_on_name_conflicts(true);
        })
        .expect("configured");

    assert!(resolver.options().fail_on_name_conflicts);
    assert_eq!(resolve(&resolver, "Box<int>"), None);
    assert_eq!(resolve(&resolver, "Order"), Some(shop.billing_order));
}

#[test]
fn test_configure_from_settings() {
    let shop = shop();
    let resolver = shop.resolver();
    let settings = ResolverSettings::from_json_str(r#"{"excludeModules": ["Billing.*"]}"#)
        .expect("settings");

    resolver.configure_from_settings(&settings).expect("configured");
    assert_eq!(resolve(&resolver, "Order"), Some(shop.shop_order));
}

// =============================================================================
// Additional mappings
// =============================================================================

#[test]
fn test_map_types_overrides_catalog() {
    let shop = shop();
    let resolver = shop.resolver();

    resolver
        .map_types(&[shop.billing_order], None)
        .expect("mapped");
    resolver
        .map_types(&[shop.billing_order], None)
        .expect("mapped twice");
    assert_eq!(resolve(&resolver, "Order"), Some(shop.billing_order));

    // Existing keys are kept.
    resolver.map_types(&[shop.shop_order], None).expect("mapped");
    assert_eq!(resolve(&resolver, "Order"), Some(shop.billing_order));
}

#[test]
fn test_map_types_with_explicit_formatter() {
    let shop = shop();
    let resolver = shop.resolver();
    resolver
        .configure(|options| {
            options.naming_strategy(NamingStrategy::Full);
        })
        .expect("configured");

    resolver
        .map_types(&[shop.shop_order], Some(&ShortNameFormatter))
        .expect("mapped");
    assert_eq!(resolve(&resolver, "Order"), Some(shop.shop_order));
    // Mapping does not realize the catalog.
    assert!(!resolver.is_realized());
}

#[test]
fn test_additional_types_are_per_call() {
    let shop = shop();
    let resolver = shop.resolver();
    let extra = [shop.shop_order];

    assert_eq!(
        resolver
            .resolve_with("Order", AdditionalTypes::Types(&extra))
            .expect("no fatal error"),
        Some(shop.shop_order)
    );
    assert_eq!(resolve(&resolver, "Order"), None);

    let mut mapping = TypeMapping::default();
    mapping.insert("Money".to_string(), shop.alias("decimal"));
    assert_eq!(
        resolver
            .resolve_with("Box<Money>", AdditionalTypes::Mapping(&mapping))
            .expect("no fatal error"),
        Some(shop.close(shop.box1, &[shop.alias("decimal")]))
    );
    assert_eq!(
        resolver
            .resolve_by_full_name_with("Money", Some(&mapping))
            .expect("no fatal error"),
        Some(shop.alias("decimal"))
    );
    assert_eq!(resolve(&resolver, "Money"), None);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_catalog_is_built_once_under_contention() {
    let shop = shop();
    let resolver = shop.resolver();
    let int = shop.alias("int");
    let expected = shop.close(shop.box1, &[int]);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(resolve(&resolver, "Box<int>"), Some(expected));
                }
            });
        }
    });

    assert_eq!(shop.scans.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_map_types_and_resolve() {
    let shop = shop();
    let resolver = shop.resolver();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..20 {
                resolver
                    .map_types(&[shop.billing_order], None)
                    .expect("mapped");
            }
        });
        scope.spawn(|| {
            for _ in 0..20 {
                let found = resolve(&resolver, "Billing.Order");
                assert_eq!(found, Some(shop.billing_order));
            }
        });
    });

    assert_eq!(resolve(&resolver, "Order"), Some(shop.billing_order));
}
