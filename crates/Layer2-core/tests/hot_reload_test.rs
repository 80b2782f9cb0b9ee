//! Hot reload 통합 테스트 - 연쇄 무효화, 재발견, 플러그인 알림
//!
//! `cargo test -p trellis-core --test hot_reload_test`

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use trellis_core::{
    DevRegistry, HotReloadAware, HotReloadOutcome, MetricsCollector, PluginCapability,
    RegistryConfig, RegistryEvent, RegistryPlugin, Result, RootRegistry, ScanScope,
    StaticTypeProvider, TypeDescriptor,
};

fn order_service() -> TypeDescriptor {
    TypeDescriptor::new("app.services.OrderService")
        .annotated("service")
        .with_field("gateway", "PaymentGateway")
}

fn payment_gateway() -> TypeDescriptor {
    TypeDescriptor::new("app.services.PaymentGateway")
        .annotated("service")
        .with_method("charge", "Receipt")
}

fn receipt() -> TypeDescriptor {
    TypeDescriptor::new("app.services.Receipt")
}

fn setup() -> (DevRegistry, Arc<StaticTypeProvider>, Arc<MetricsCollector>) {
    let metrics = Arc::new(MetricsCollector::default());
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        vec![order_service(), payment_gateway(), receipt()],
    ));
    let registry = DevRegistry::new(
        RegistryConfig::development("app").with_scope(["app.services"]),
        metrics.clone(),
    )
    .with_provider(provider.clone())
    .with_parent(Arc::new(RootRegistry::new(metrics.clone())));
    (registry, provider, metrics)
}

/// 훅 호출 기록
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

struct ReloadWatcher {
    recorder: Arc<Recorder>,
}

#[async_trait]
impl RegistryPlugin for ReloadWatcher {
    fn name(&self) -> &str {
        "reload-watcher"
    }

    fn capabilities(&self) -> Vec<PluginCapability> {
        vec![PluginCapability::ObserveLoads, PluginCapability::HotReloadAware]
    }

    async fn after_load(&self, name: &str, descriptor: Option<&TypeDescriptor>) -> Result<()> {
        let status = if descriptor.is_some() { "ok" } else { "missing" };
        self.recorder
            .calls
            .lock()
            .push(format!("after_load:{}:{}", name, status));
        Ok(())
    }

    fn hot_reload_hook(self: Arc<Self>) -> Option<Arc<dyn HotReloadAware>> {
        Some(self)
    }
}

#[async_trait]
impl HotReloadAware for ReloadWatcher {
    async fn on_reloaded(&self, name: &str, descriptor: &TypeDescriptor) -> Result<()> {
        self.recorder.calls.lock().push(format!(
            "reloaded:{}:{}",
            name,
            descriptor.members().len()
        ));
        Ok(())
    }
}

/// 모든 훅에서 panic 하는 플러그인
struct Panicker;

#[async_trait]
impl RegistryPlugin for Panicker {
    fn name(&self) -> &str {
        "panicker"
    }

    async fn before_load(&self, _name: &str) -> Result<()> {
        panic!("before_load exploded");
    }

    async fn after_load(&self, _name: &str, _descriptor: Option<&TypeDescriptor>) -> Result<()> {
        panic!("after_load exploded");
    }

    fn hot_reload_hook(self: Arc<Self>) -> Option<Arc<dyn HotReloadAware>> {
        Some(self)
    }
}

#[async_trait]
impl HotReloadAware for Panicker {
    async fn on_reloaded(&self, _name: &str, _descriptor: &TypeDescriptor) -> Result<()> {
        panic!("on_reloaded exploded");
    }
}

#[tokio::test]
async fn test_not_reloadable_before_discovery() {
    let (registry, _, metrics) = setup();

    let outcome = registry.hot_reload("PaymentGateway").await.unwrap();

    assert!(matches!(outcome, HotReloadOutcome::NotReloadable { ref name } if name == "PaymentGateway"));
    assert!(registry.cached_names().await.is_empty());
    assert_eq!(metrics.total_reloads(), 0);
}

#[tokio::test]
async fn test_reload_picks_up_changed_descriptor() {
    let (registry, provider, metrics) = setup();
    let recorder = Arc::new(Recorder::default());
    registry
        .register_plugin(Arc::new(ReloadWatcher {
            recorder: recorder.clone(),
        }))
        .await
        .unwrap();

    registry.discover_all(&ScanScope::new(["app.services"])).await;
    assert!(registry.hot_reloadable_set().await.contains("PaymentGateway"));

    provider.upsert(
        payment_gateway()
            .annotated("v2")
            .with_method("refund", "Receipt"),
    );

    let outcome = registry.hot_reload("PaymentGateway").await.unwrap();

    assert!(outcome.is_reloaded());
    assert_eq!(outcome.invalidated(), ["PaymentGateway", "OrderService"]);
    let descriptor = outcome.descriptor().unwrap();
    assert!(descriptor.has_annotation("v2"));

    let cached = registry.resolve("PaymentGateway").await.unwrap();
    assert!(Arc::ptr_eq(descriptor, &cached));
    assert!(!registry.is_cached("OrderService").await);
    assert_eq!(metrics.total_reloads(), 1);

    assert!(recorder
        .calls()
        .contains(&"reloaded:PaymentGateway:2".to_string()));
}

#[tokio::test]
async fn test_dependents_rediscovered_lazily() {
    let (registry, _, metrics) = setup();
    registry.discover_configured_scope().await;

    registry.hot_reload("PaymentGateway").await.unwrap();
    let loads = metrics.total_loads();

    let order = registry.resolve("OrderService").await.unwrap();
    assert_eq!(order.simple_name(), "OrderService");
    assert_eq!(metrics.total_loads(), loads + 1);
    assert!(registry
        .dependents_of("PaymentGateway")
        .await
        .contains("OrderService"));
}

#[tokio::test]
async fn test_failed_reload_leaves_type_invalidated() {
    let (registry, provider, metrics) = setup();
    let mut events = registry.subscribe();
    registry.discover_configured_scope().await;

    assert!(provider.remove("app.services.PaymentGateway"));
    let outcome = registry.hot_reload("PaymentGateway").await.unwrap();

    match &outcome {
        HotReloadOutcome::Failed { invalidated, error } => {
            assert_eq!(invalidated, &["PaymentGateway", "OrderService"]);
            assert!(error.contains("PaymentGateway"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!registry.is_cached("PaymentGateway").await);
    assert_eq!(metrics.total_errors(), 1);
    assert_eq!(metrics.total_reloads(), 0);

    let mut failed = false;
    while let Ok(event) = events.try_recv() {
        if let RegistryEvent::ReloadFailed { name, .. } = event {
            assert_eq!(name, "PaymentGateway");
            failed = true;
        }
    }
    assert!(failed);
}

#[tokio::test]
async fn test_heavily_connected_type_not_reloadable() {
    let metrics = Arc::new(MetricsCollector::default());
    let hub = TypeDescriptor::new("app.Hub")
        .with_field("a", "A")
        .with_field("b", "B")
        .with_field("c", "C")
        .with_field("d", "D");
    let leaves = ["A", "B", "C", "D"].map(|n| TypeDescriptor::new(format!("app.{}", n)));
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        std::iter::once(hub).chain(leaves).collect(),
    ));
    let registry = DevRegistry::new(
        RegistryConfig::development("app").with_hot_reload_threshold(3),
        metrics,
    )
    .with_provider(provider);

    registry.discover_all(&ScanScope::new(["app"])).await;
    let hot = registry.hot_reloadable_set().await;

    assert!(!hot.contains("Hub"));
    assert_eq!(hot.len(), 4);
    assert!(matches!(
        registry.hot_reload("Hub").await.unwrap(),
        HotReloadOutcome::NotReloadable { .. }
    ));
    assert!(registry.is_cached("Hub").await);
}

#[tokio::test]
async fn test_reload_event_sequence() {
    let (registry, _, _) = setup();
    registry.discover_configured_scope().await;
    let mut events = registry.subscribe();

    registry.hot_reload("PaymentGateway").await.unwrap();

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert_eq!(
        received,
        vec![
            RegistryEvent::invalidated("PaymentGateway"),
            RegistryEvent::invalidated("OrderService"),
            RegistryEvent::discovered(&payment_gateway()),
            RegistryEvent::Reloaded {
                name: "PaymentGateway".to_string(),
                invalidated: vec!["PaymentGateway".to_string(), "OrderService".to_string()],
            },
        ]
    );
}

#[tokio::test]
async fn test_panicking_plugin_is_isolated() {
    let (registry, _, _) = setup();
    let recorder = Arc::new(Recorder::default());
    registry.register_plugin(Arc::new(Panicker)).await.unwrap();
    registry
        .register_plugin(Arc::new(ReloadWatcher {
            recorder: recorder.clone(),
        }))
        .await
        .unwrap();

    let report = registry.discover_configured_scope().await;
    assert_eq!(report.discovered, 3);

    let outcome = registry.hot_reload("Receipt").await.unwrap();
    assert!(outcome.is_reloaded());

    let calls = recorder.calls();
    assert!(calls.contains(&"after_load:Receipt:ok".to_string()));
    assert!(calls.contains(&"reloaded:Receipt:0".to_string()));
    assert_eq!(registry.plugins().plugin_names().await, ["panicker", "reload-watcher"]);
}

#[tokio::test]
async fn test_after_load_sees_failed_attempts() {
    let (registry, _, _) = setup();
    let recorder = Arc::new(Recorder::default());
    registry
        .register_plugin(Arc::new(ReloadWatcher {
            recorder: recorder.clone(),
        }))
        .await
        .unwrap();

    let _ = registry.resolve("Ghost").await;

    assert_eq!(recorder.calls(), vec!["after_load:Ghost:missing"]);
}

#[tokio::test]
async fn test_reload_type_discovered_outside_configured_scope() {
    let metrics = Arc::new(MetricsCollector::default());
    let controller = TypeDescriptor::new("app.web.OrderController")
        .annotated("controller")
        .with_field("orders", "OrderService");
    let provider = Arc::new(StaticTypeProvider::with_types(
        "app",
        vec![order_service(), payment_gateway(), receipt(), controller],
    ));
    let registry = DevRegistry::new(
        RegistryConfig::development("app").with_scope(["app.services"]),
        metrics.clone(),
    )
    .with_provider(provider.clone());

    let report = registry.discover_all(&ScanScope::unrestricted()).await;
    assert_eq!(report.discovered, 4);
    assert!(registry.hot_reloadable_set().await.contains("OrderController"));

    provider.upsert(
        TypeDescriptor::new("app.web.OrderController")
            .annotated("controller")
            .annotated("v2")
            .with_field("orders", "OrderService"),
    );
    let outcome = registry.hot_reload("OrderController").await.unwrap();

    assert!(outcome.is_reloaded(), "got {outcome:?}");
    assert_eq!(outcome.invalidated(), ["OrderController"]);
    assert!(outcome.descriptor().unwrap().has_annotation("v2"));
    assert!(registry.is_cached("app.web.OrderController").await);
    assert_eq!(metrics.total_reloads(), 1);
    assert_eq!(metrics.total_errors(), 0);
}
