//! # Type Registry System
//!
//! 부모/자식 구조의 타입 레지스트리
//!
//! ## 개요
//!
//! `DevRegistry` 는 스캔 범위 안의 타입을 프로바이더에서 찾아 캐시하고,
//! 찾지 못하면 부모(`RootRegistry`)로 위임합니다. 개발 모드에서는 fuzzy 매칭과
//! 의존성 그래프 기반의 연쇄 무효화 / hot reload 를 지원합니다.
//!
//! ## 설계 원칙
//!
//! 1. **Interior Mutability**: 상태 전체를 하나의 RwLock 으로 보호
//! 2. **Delegation**: 로컬 디스커버리 실패 시 부모 조회
//! 3. **Event-driven**: 변경 시 broadcast 이벤트 발행
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       DevRegistry                            │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │  RwLock<RegistryState>                                  ││
//! │  │  cache │ aliases │ DependencyGraph │ annotations │ hot  ││
//! │  └─────────────────────────────────────────────────────────┘│
//! │        │ miss                         │ hooks                │
//! │        ▼                              ▼                      │
//! │  TypeProvider* ──▶ matcher      PluginHost                   │
//! │        │ not found                                           │
//! │        ▼                                                     │
//! │  RootRegistry (TypeLookup) ── BuiltinTypeProvider (core.)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용 예시
//!
//! ```ignore
//! let metrics = Arc::new(MetricsCollector::default());
//! let root = Arc::new(RootRegistry::new(Arc::clone(&metrics)));
//! let registry = DevRegistry::new(RegistryConfig::development("app"), metrics)
//!     .with_provider(Arc::new(provider))
//!     .with_parent(root);
//!
//! registry.discover_all(&ScanScope::new(["app.services"])).await;
//! let outcome = registry.hot_reload("OrderService").await?;
//! ```

mod dev;
mod graph;
mod matcher;
mod reload;
mod root;
mod traits;

pub use dev::DevRegistry;
pub use graph::{DependencyGraph, GraphSnapshot};
pub use matcher::{find_match, MatchKind, MatchOutcome};
pub use reload::{DiscoveryReport, HotReloadOutcome, RegistryStats};
pub use root::RootRegistry;
pub use traits::{RegistryEvent, TypeLookup, TypeOrigin};
