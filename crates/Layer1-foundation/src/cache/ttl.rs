//! TTL Cache - 고정 TTL 과 지연 만료를 갖는 캐시
//!
//! 각 항목은 저장 시각을 가지며 `now - cached_at > ttl` 이면 만료입니다.
//! 만료는 지연 처리되어 키를 다시 조회할 때까지 제거되지 않고, hit 은 원본을
//! 다시 읽지 않습니다.
//!
//! 시각은 `tokio::time::Instant` 를 사용하므로 테스트에서
//! `tokio::time::pause()` / `tokio::time::advance()` 로 만료를 제어할 수 있습니다.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

/// 저장 시각을 포함한 캐시 항목
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// 캐시 키 (예: 리소스 위치)
    pub key: K,
    /// 캐시된 내용
    pub value: V,
    /// 저장 시각
    pub cached_at: Instant,
}

impl<K, V> CacheEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            cached_at: Instant::now(),
        }
    }

    /// 항목 경과 시간
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.cached_at)
    }

    /// `now - cached_at > ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// 모니터링용 캐시 통계
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// 유효한 hit
    pub hits: u64,
    /// miss (없음 또는 만료)
    pub misses: u64,
    /// 만료로 제거된 항목 수
    pub expired: u64,
}

impl CacheStats {
    /// 전체 hit 비율
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// 고정 TTL 과 지연 만료를 갖는 key/value 캐시
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<K, V>>,
    ttl: Duration,
    stats: CacheStats,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// 주어진 TTL 로 캐시 생성
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::default(),
        }
    }

    /// 리소스 내용 기본값: 5분 TTL
    pub fn default_for_resources() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// 유효한 값의 복사본 조회 (만료 항목은 제거 후 miss 로 집계)
    pub fn get(&mut self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                self.stats.hits += 1;
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.stats.expired += 1;
        }
        self.stats.misses += 1;
        None
    }

    /// 통계에 영향 없이 유효 여부 확인
    pub fn contains_fresh(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map(|e| !e.is_expired(self.ttl))
            .unwrap_or(false)
    }

    /// 현재 시각으로 값 저장 (기존 값 교체)
    pub fn insert(&mut self, key: K, value: V) {
        self.entries
            .insert(key.clone(), CacheEntry::new(key, value));
    }

    /// 특정 키 제거
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// 모든 항목 제거 (통계는 유지)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 저장된 항목 수 (만료되었을 수 있는 항목 포함)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
