//! 레지스트리 통합 테스트 - 디스커버리, 캐시, 위임, 무효화
//!
//! `cargo test -p trellis-core --test registry_test`

use std::sync::Arc;
use trellis_core::{
    DevRegistry, Error, InvalidationPolicy, MetricsCollector, RegistryConfig, RegistryEvent,
    RootRegistry, ScanScope, StaticTypeProvider, TypeDescriptor, TypeOrigin,
};

fn app_types() -> Vec<TypeDescriptor> {
    vec![
        TypeDescriptor::new("app.services.OrderService")
            .annotated("service")
            .with_field("gateway", "PaymentGateway")
            .with_field("id", "String"),
        TypeDescriptor::new("app.services.PaymentGateway")
            .annotated("service")
            .with_field("currency", "String"),
        TypeDescriptor::new("app.web.OrderController")
            .annotated("controller")
            .with_field("orders", "OrderService"),
    ]
}

fn setup(config: RegistryConfig) -> (DevRegistry, Arc<MetricsCollector>) {
    let metrics = Arc::new(MetricsCollector::default());
    let root = Arc::new(RootRegistry::new(metrics.clone()));
    let provider = Arc::new(StaticTypeProvider::with_types("app", app_types()));
    let registry = DevRegistry::new(config, metrics.clone())
        .with_provider(provider)
        .with_parent(root);
    (registry, metrics)
}

fn dev_config() -> RegistryConfig {
    RegistryConfig::development("app").with_scope(["app"])
}

#[tokio::test]
async fn test_discover_all_is_idempotent() {
    let (registry, _) = setup(dev_config());
    let scope = ScanScope::new(["app"]);

    let first = registry.discover_all(&scope).await;
    let names = registry.cached_names().await;
    let graph = registry.dependency_graph().await;
    let stats = registry.stats().await;

    let second = registry.discover_all(&scope).await;

    assert_eq!(first.discovered, 3);
    assert_eq!(second.discovered, first.discovered);
    assert_eq!(second.hot_reloadable, first.hot_reloadable);
    assert_eq!(registry.cached_names().await, names);
    assert_eq!(registry.dependency_graph().await, graph);
    assert_eq!(registry.stats().await, stats);
}

#[tokio::test]
async fn test_discovery_builds_graph_and_index() {
    let (registry, _) = setup(dev_config());
    registry.discover_configured_scope().await;

    let deps = registry.dependencies_of("OrderService").await;
    assert_eq!(deps.into_iter().collect::<Vec<_>>(), vec!["PaymentGateway"]);
    assert!(registry.dependencies_of("PaymentGateway").await.is_empty());

    let dependents = registry.dependents_of("OrderService").await;
    assert!(dependents.contains("OrderController"));

    let services: Vec<String> = registry
        .types_annotated_with("service")
        .await
        .iter()
        .map(|d| d.simple_name().to_string())
        .collect();
    assert_eq!(services, vec!["OrderService", "PaymentGateway"]);
    assert!(registry.types_annotated_with("missing").await.is_empty());
}

#[tokio::test]
async fn test_scope_limits_discovery() {
    let (registry, _) = setup(dev_config());
    let report = registry.discover_all(&ScanScope::new(["app.services"])).await;

    assert_eq!(report.discovered, 2);
    assert!(!registry.is_cached("OrderController").await);
    assert_eq!(report.hot_reloadable, 2);
}

#[tokio::test]
async fn test_cache_hit_and_miss_metrics() {
    let (registry, metrics) = setup(dev_config());

    let first = registry.resolve("PaymentGateway").await.unwrap();
    let second = registry.resolve("PaymentGateway").await.unwrap();
    let by_qualified = registry
        .resolve("app.services.PaymentGateway")
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &by_qualified));
    assert_eq!(metrics.cache_misses(), 1);
    assert_eq!(metrics.cache_hits(), 2);
    assert_eq!(metrics.total_loads(), 1);
    assert_eq!(registry.origin_of("PaymentGateway").await, Some(TypeOrigin::Local));
}

#[tokio::test]
async fn test_unknown_local_type_delegates_to_parent() {
    let (registry, metrics) = setup(dev_config());

    let string = registry.resolve("String").await.unwrap();

    assert_eq!(string.qualified_name(), "core.String");
    assert!(string.has_annotation("builtin"));
    assert_eq!(registry.origin_of("String").await, Some(TypeOrigin::Parent));
    assert_eq!(metrics.cache_misses(), 1);
    assert_eq!(metrics.total_loads(), 1);
    assert_eq!(metrics.total_errors(), 0);

    // 위임된 타입은 그래프에 들어가지 않음
    assert!(registry.dependency_graph().await.is_empty());
    assert!(!registry.hot_reloadable_set().await.contains("String"));

    registry.resolve("String").await.unwrap();
    assert_eq!(metrics.cache_hits(), 1);
    assert_eq!(metrics.total_loads(), 1);
}

#[tokio::test]
async fn test_not_found_records_error() {
    let (registry, metrics) = setup(dev_config());

    let err = registry.resolve("Nonexistent").await.unwrap_err();

    assert!(matches!(err, Error::TypeNotFound(ref name) if name == "Nonexistent"));
    assert_eq!(metrics.total_errors(), 1);
    assert!(!registry.is_cached("Nonexistent").await);
}

#[tokio::test]
async fn test_fuzzy_match_only_in_development_mode() {
    let (dev, _) = setup(dev_config());
    let found = dev.resolve("paymentgateway").await.unwrap();
    assert_eq!(found.simple_name(), "PaymentGateway");

    let (prod, _) = setup(RegistryConfig::default().with_scope(["app"]));
    assert!(prod.resolve("paymentgateway").await.is_err());
    assert!(prod.resolve("PaymentGateway").await.is_ok());
}

#[tokio::test]
async fn test_ambiguous_fuzzy_match() {
    let metrics = Arc::new(MetricsCollector::default());
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        vec![
            TypeDescriptor::new("app.services.OrderService"),
            TypeDescriptor::new("app.services.UserService"),
        ],
    ));
    let registry = DevRegistry::new(dev_config(), metrics.clone())
        .with_provider(provider)
        .with_parent(Arc::new(RootRegistry::new(metrics.clone())));

    let err = registry.resolve("Service").await.unwrap_err();

    match err {
        Error::AmbiguousMatch { name, candidates } => {
            assert_eq!(name, "Service");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(metrics.total_errors(), 1);
    assert!(registry.cached_names().await.is_empty());
}

#[tokio::test]
async fn test_cascading_invalidation_direct() {
    let (registry, metrics) = setup(dev_config());
    registry.discover_configured_scope().await;

    let invalidated = registry.invalidate_cascading("PaymentGateway").await.unwrap();

    assert_eq!(invalidated, vec!["PaymentGateway", "OrderService"]);
    assert!(!registry.is_cached("PaymentGateway").await);
    assert!(!registry.is_cached("OrderService").await);
    assert!(registry.is_cached("OrderController").await);

    let misses = metrics.cache_misses();
    registry.resolve("OrderService").await.unwrap();
    assert_eq!(metrics.cache_misses(), misses + 1);
}

#[tokio::test]
async fn test_cascading_invalidation_transitive() {
    let config = dev_config().with_invalidation_policy(InvalidationPolicy::Transitive);
    let (registry, _) = setup(config);
    registry.discover_configured_scope().await;

    let mut invalidated = registry.invalidate_cascading("PaymentGateway").await.unwrap();
    invalidated.sort();

    assert_eq!(
        invalidated,
        vec!["OrderController", "OrderService", "PaymentGateway"]
    );
    assert!(registry.cached_names().await.is_empty());
}

#[tokio::test]
async fn test_invalidate_single_and_unknown() {
    let (registry, _) = setup(dev_config());
    registry.discover_configured_scope().await;

    assert!(registry.invalidate("app.services.PaymentGateway").await.unwrap());
    assert!(!registry.is_cached("PaymentGateway").await);
    assert!(registry.is_cached("OrderService").await);

    assert!(!registry.invalidate("Nonexistent").await.unwrap());
    assert!(registry
        .invalidate_cascading("Nonexistent")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_dev_operations_rejected_outside_development_mode() {
    let (registry, _) = setup(RegistryConfig::default().with_scope(["app"]));
    registry.discover_configured_scope().await;

    assert!(matches!(
        registry.invalidate("OrderService").await,
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        registry.invalidate_cascading("OrderService").await,
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(matches!(
        registry.hot_reload("OrderService").await,
        Err(Error::UnsupportedOperation(_))
    ));
    assert!(registry.is_cached("OrderService").await);
}

#[tokio::test]
async fn test_subtypes_of() {
    let metrics = Arc::new(MetricsCollector::default());
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        vec![
            TypeDescriptor::new("app.model.Shape"),
            TypeDescriptor::new("app.model.Polygon").with_supertype("app.model.Shape"),
            TypeDescriptor::new("app.model.Square").with_supertype("app.model.Polygon"),
            TypeDescriptor::new("app.model.Circle")
                .with_supertype("app.model.Shape")
                .with_interface("app.model.Drawable"),
            TypeDescriptor::new("app.model.Label").with_interface("app.model.Drawable"),
        ],
    ));
    let registry = DevRegistry::new(dev_config(), metrics).with_provider(provider);
    registry.discover_configured_scope().await;

    let shapes: Vec<String> = registry
        .subtypes_of("Shape")
        .await
        .iter()
        .map(|d| d.simple_name().to_string())
        .collect();
    assert_eq!(shapes, vec!["Circle", "Polygon", "Square"]);

    let drawables: Vec<String> = registry
        .subtypes_of("app.model.Drawable")
        .await
        .iter()
        .map(|d| d.simple_name().to_string())
        .collect();
    assert_eq!(drawables, vec!["Circle", "Label"]);
}

#[tokio::test]
async fn test_events_are_broadcast() {
    let (registry, _) = setup(dev_config());
    let mut events = registry.subscribe();

    registry.discover_all(&ScanScope::new(["app.services"])).await;
    registry.resolve("String").await.unwrap();
    registry.clear().await;

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    let discovered = received
        .iter()
        .filter(|e| matches!(e, RegistryEvent::Discovered { .. }))
        .count();
    assert_eq!(discovered, 2);
    assert!(received.contains(&RegistryEvent::BulkDiscovered { count: 2 }));
    assert!(received.contains(&RegistryEvent::Delegated {
        name: "String".to_string(),
        parent: "root".to_string(),
    }));
    assert_eq!(received.last(), Some(&RegistryEvent::Cleared));
}

#[tokio::test]
async fn test_clear_resets_state() {
    let (registry, _) = setup(dev_config());
    registry.discover_configured_scope().await;
    registry.clear().await;

    let stats = registry.stats().await;
    assert_eq!(stats.cached, 0);
    assert_eq!(stats.graph_nodes, 0);
    assert_eq!(stats.hot_reloadable, 0);
    assert_eq!(stats.annotation_tags, 0);
}

#[tokio::test]
async fn test_metrics_reset() {
    let (registry, metrics) = setup(dev_config());
    registry.discover_configured_scope().await;
    registry.resolve("OrderService").await.unwrap();
    let _ = registry.resolve("Nonexistent").await;

    assert!(metrics.total_loads() >= 3);
    assert_eq!(metrics.total_errors(), 1);

    metrics.reset();
    let summary = metrics.summary();
    for key in ["total_loads", "total_errors", "cache_hits", "cache_misses"] {
        assert_eq!(summary.get(key).and_then(|v| v.as_u64()), Some(0), "{key}");
    }

    registry.resolve("OrderService").await.unwrap();
    assert_eq!(metrics.cache_hits(), 1);
}

#[tokio::test]
async fn test_repeated_resolve_by_qualified_suffix_hits_cache() {
    let (registry, metrics) = setup(dev_config());

    let first = registry.resolve("services.PaymentGateway").await.unwrap();
    let second = registry.resolve("services.PaymentGateway").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(metrics.cache_misses(), 1);
    assert_eq!(metrics.cache_hits(), 1);
    assert_eq!(metrics.total_loads(), 1);
}

#[tokio::test]
async fn test_repeated_fuzzy_resolve_hits_cache() {
    let (registry, metrics) = setup(dev_config());

    let first = registry.resolve("paymentgateway").await.unwrap();
    let second = registry.resolve("paymentgateway").await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.qualified_name(), "app.services.PaymentGateway");
    assert_eq!(metrics.cache_misses(), 1);
    assert_eq!(metrics.cache_hits(), 1);
    assert_eq!(metrics.total_loads(), 1);
}

fn same_simple_name_registry() -> DevRegistry {
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        vec![
            TypeDescriptor::new("app.a.User")
                .annotated("entity")
                .with_field("account", "Account"),
            TypeDescriptor::new("app.b.User")
                .annotated("dto")
                .with_field("profile", "Profile"),
            TypeDescriptor::new("app.a.Account"),
            TypeDescriptor::new("app.b.Profile"),
        ],
    ));
    DevRegistry::new(dev_config(), Arc::new(MetricsCollector::default())).with_provider(provider)
}

#[tokio::test]
async fn test_same_simple_name_types_coexist() {
    let registry = same_simple_name_registry();

    let report = registry.discover_all(&ScanScope::unrestricted()).await;

    assert_eq!(report.discovered, 4);
    assert_eq!(
        registry.cached_names().await,
        vec!["app.a.Account", "app.a.User", "app.b.Profile", "app.b.User"]
    );

    let a = registry.resolve("app.a.User").await.unwrap();
    let b = registry.resolve("app.b.User").await.unwrap();
    assert_eq!(a.qualified_name(), "app.a.User");
    assert_eq!(b.qualified_name(), "app.b.User");
    assert_eq!(registry.metrics().cache_hits(), 2);

    // 첫 번째로 발견된 타입이 simple name 조회를 받음
    let simple = registry.resolve("User").await.unwrap();
    assert!(Arc::ptr_eq(&simple, &a));

    let entities = registry.types_annotated_with("entity").await;
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].qualified_name(), "app.a.User");
    let dtos = registry.types_annotated_with("dto").await;
    assert_eq!(dtos[0].qualified_name(), "app.b.User");

    let deps: Vec<String> = registry.dependencies_of("User").await.into_iter().collect();
    assert_eq!(deps, vec!["Account", "Profile"]);
}

#[tokio::test]
async fn test_invalidating_one_of_same_simple_name_keeps_other() {
    let registry = same_simple_name_registry();
    registry.discover_all(&ScanScope::unrestricted()).await;

    assert!(registry.invalidate("app.a.User").await.unwrap());

    assert!(!registry.is_cached("app.a.User").await);
    assert!(registry.is_cached("app.b.User").await);
    assert!(registry.types_annotated_with("entity").await.is_empty());

    let remaining = registry.resolve("User").await.unwrap();
    assert_eq!(remaining.qualified_name(), "app.b.User");

    let deps: Vec<String> = registry.dependencies_of("User").await.into_iter().collect();
    assert_eq!(deps, vec!["Profile"]);
    assert!(registry.hot_reloadable_set().await.contains("User"));
}
