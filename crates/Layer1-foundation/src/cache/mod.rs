//! # Trellis Cache
//!
//! 리소스 콘텐츠 캐시 등에 쓰이는 TTL 기반 캐시.
//!
//! - 고정 TTL, 접근 시점에만 만료 확인 (lazy expiry)
//! - 조회는 항상 복사본을 반환
//! - hit / miss / expired 통계

mod ttl;

pub use ttl::{CacheEntry, CacheStats, TtlCache};
