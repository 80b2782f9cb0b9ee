//! Metrics - 타입 로드/에러/리로드/캐시 메트릭
//!
//! - `collector.rs` - 공유 MetricsCollector (atomic 카운터 + 타입별 통계)
//! - `stats.rs` - ClassLoadStats, ClassLoadEvent

mod collector;
mod stats;

pub use collector::{MetricsCollector, MetricsSummary};
pub use stats::{ClassLoadEvent, ClassLoadStats};
