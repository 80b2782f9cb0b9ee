//! # trellis-foundation
//!
//! Foundation layer for Trellis:
//! - Error: 중앙 에러 타입 (`Error`, `Result`)
//! - Config: 통합 설정 (registry / resources / metrics) + 계층 로더
//! - Cache: TTL 캐시 (lazy expiry)
//! - Metrics: 타입 로드/에러/리로드/캐시 메트릭 수집기
//! - Telemetry: tracing subscriber 초기화
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  trellis-core (Layer2)                                   │
//! │  ├── DevRegistry ──delegate──▶ RootRegistry              │
//! │  ├── PluginHost                                          │
//! │  └── ResourceResolver                                    │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  trellis-foundation (Layer1)                             │
//! │  ├── MetricsCollector (Arc 공유)                         │
//! │  ├── TtlCache                                            │
//! │  └── TrellisConfig / Error                               │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    load_config_from_file, ConfigLoader, InvalidationPolicy, MetricsConfig, RegistryConfig,
    ResourceConfig, TrellisConfig,
};

// ============================================================================
// Cache (캐시)
// ============================================================================
pub use cache::{CacheEntry, CacheStats, TtlCache};

// ============================================================================
// Metrics (메트릭)
// ============================================================================
pub use metrics::{ClassLoadEvent, ClassLoadStats, MetricsCollector, MetricsSummary};

// ============================================================================
// Telemetry
// ============================================================================
pub use telemetry::init_tracing;
