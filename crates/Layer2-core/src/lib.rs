//! trellis-core: Core Runtime for Trellis
//!
//! Layer2 - 타입 레지스트리 / hot reload / 플러그인 / 리소스 레이어
//!
//! # 주요 모듈
//!
//! - `reflect`: 타입 메타데이터 (`TypeDescriptor`) 와 타입 열거 (`TypeProvider`)
//! - `registry`: 개발용 레지스트리 (`DevRegistry`), 부모 위임, 의존성 그래프, hot reload
//! - `plugin`: 레지스트리 확장 훅 (`RegistryPlugin`, `PluginHost`)
//! - `resource`: 리소스 참조 해석과 TTL 캐시 로딩 (`ResourceResolver`)
//!
//! # 사용 예시
//!
//! ```ignore
//! use trellis_core::{DevRegistry, RootRegistry, ScanScope, StaticTypeProvider, TypeDescriptor};
//! use trellis_foundation::{MetricsCollector, RegistryConfig};
//!
//! let metrics = Arc::new(MetricsCollector::default());
//! let root = Arc::new(RootRegistry::new(metrics.clone()));
//!
//! let provider = Arc::new(StaticTypeProvider::with_types("app", vec![
//!     TypeDescriptor::new("app.services.OrderService")
//!         .annotated("service")
//!         .with_field("gateway", "PaymentGateway"),
//!     TypeDescriptor::new("app.services.PaymentGateway").annotated("service"),
//! ]));
//!
//! let registry = DevRegistry::new(RegistryConfig::development("app"), metrics)
//!     .with_provider(provider)
//!     .with_parent(root);
//!
//! registry.discover_all(&ScanScope::new(["app.services"])).await?;
//! let outcome = registry.hot_reload("PaymentGateway").await?;
//! ```

pub mod plugin;
pub mod reflect;
pub mod registry;
pub mod resource;

// Re-exports: Reflect
pub use reflect::{
    Annotation, BuiltinTypeProvider, ManifestTypeProvider, MemberDecl, MemberKind, ScanScope,
    StaticTypeProvider, TypeClassifier, TypeDescriptor, TypeProvider,
};

// Re-exports: Registry
pub use registry::{
    DependencyGraph, DevRegistry, DiscoveryReport, HotReloadOutcome, RegistryEvent,
    RegistryStats, RootRegistry, TypeLookup, TypeOrigin,
};

// Re-exports: Plugin
pub use plugin::{HotReloadAware, PluginCapability, PluginContext, PluginHost, RegistryPlugin};

// Re-exports: Resource
pub use resource::{Locator, ResourceResolver, Scheme};

// Re-exports from foundation
pub use trellis_foundation::{Error, InvalidationPolicy, MetricsCollector, RegistryConfig, Result};
