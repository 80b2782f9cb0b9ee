//! Metrics Collector - 타입 로드, 에러, reload, 캐시 집계
//!
//! 프로세스의 모든 레지스트리가 하나의 `Arc<MetricsCollector>` 를 공유합니다.
//! 전역 카운터는 atomic 이고, 이름별 통계와 상세 이벤트 버퍼는 `parking_lot`
//! 락 뒤에 있으며 락은 한 번의 갱신 동안만 잡습니다.

use super::stats::{ClassLoadEvent, ClassLoadStats};
use crate::config::MetricsConfig;
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::{Display, Write as _};
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// 타입 이름별로 보관하는 에러 메시지 수
const MAX_ERRORS_PER_TYPE: usize = 100;

/// 리포트의 top-N 섹션별 항목 수
const REPORT_TOP_N: usize = 5;

/// 직렬화 가능한 평면 메트릭 스냅샷
pub type MetricsSummary = BTreeMap<String, Value>;

/// 타입 레지스트리 메트릭 수집기
#[derive(Debug)]
pub struct MetricsCollector {
    total_loads: AtomicU64,
    total_errors: AtomicU64,
    total_reloads: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    per_type: RwLock<HashMap<String, ClassLoadStats>>,
    detailed: AtomicBool,
    events: Mutex<VecDeque<ClassLoadEvent>>,
    event_capacity: usize,
}

impl MetricsCollector {
    /// 설정으로부터 수집기 생성
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            total_loads: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_reloads: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            per_type: RwLock::new(HashMap::new()),
            detailed: AtomicBool::new(config.detailed_tracking),
            events: Mutex::new(VecDeque::new()),
            event_capacity: config.event_buffer_capacity.max(2),
        }
    }

    // ========================================================================
    // 기록
    // ========================================================================

    /// `name` 로드 성공 기록
    pub fn record_load(&self, name: &str, duration_micros: u64) {
        self.total_loads.fetch_add(1, Ordering::Relaxed);
        {
            let mut per_type = self.per_type.write();
            let stats = per_type.entry(name.to_string()).or_default();
            stats.load_count += 1;
            stats.total_load_time_micros += duration_micros;
        }

        if self.is_detailed_tracking() {
            self.push_event(ClassLoadEvent::loaded(
                name,
                Duration::from_micros(duration_micros),
            ));
        }
    }

    /// `name` 로드 실패 기록
    pub fn record_error(&self, name: &str, error: impl Display) {
        let message = error.to_string();
        self.total_errors.fetch_add(1, Ordering::Relaxed);
        {
            let mut per_type = self.per_type.write();
            let stats = per_type.entry(name.to_string()).or_default();
            stats.error_count += 1;
            if stats.errors.len() >= MAX_ERRORS_PER_TYPE {
                stats.errors.remove(0);
            }
            stats.errors.push(message.clone());
        }

        if self.is_detailed_tracking() {
            self.push_event(ClassLoadEvent::failed(name, message));
        }
    }

    /// `name` hot reload 기록
    pub fn record_reload(&self, name: &str) {
        self.total_reloads.fetch_add(1, Ordering::Relaxed);
        let mut per_type = self.per_type.write();
        per_type.entry(name.to_string()).or_default().reload_count += 1;
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    fn push_event(&self, event: ClassLoadEvent) {
        let mut events = self.events.lock();
        events.push_back(event);
        if events.len() > self.event_capacity {
            let overflow = events.len() / 2;
            events.drain(..overflow);
        }
    }

    // ========================================================================
    // 상세 추적
    // ========================================================================

    pub fn enable_detailed_tracking(&self) {
        self.detailed.store(true, Ordering::Relaxed);
    }

    /// 상세 추적 끄기 (버퍼된 이벤트 삭제)
    pub fn disable_detailed_tracking(&self) {
        self.detailed.store(false, Ordering::Relaxed);
        self.events.lock().clear();
    }

    pub fn is_detailed_tracking(&self) -> bool {
        self.detailed.load(Ordering::Relaxed)
    }

    // ========================================================================
    // 조회
    // ========================================================================

    pub fn total_loads(&self) -> u64 {
        self.total_loads.load(Ordering::Relaxed)
    }

    pub fn total_errors(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }

    pub fn total_reloads(&self) -> u64 {
        self.total_reloads.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// `hits / (hits + misses)`, 접근 전에는 0.0
    pub fn cache_hit_ratio(&self) -> f64 {
        let hits = self.cache_hits();
        let total = hits + self.cache_misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// 전체 이름에 대한 가중 평균 로드 시간 (마이크로초)
    pub fn average_load_time(&self) -> f64 {
        let per_type = self.per_type.read();
        let (loads, micros) = per_type.values().fold((0u64, 0u64), |(l, m), s| {
            (l + s.load_count, m + s.total_load_time_micros)
        });
        if loads == 0 {
            0.0
        } else {
            micros as f64 / loads as f64
        }
    }

    /// 이름 하나의 통계 복사본
    pub fn stats_for(&self, name: &str) -> Option<ClassLoadStats> {
        self.per_type.read().get(name).cloned()
    }

    /// 평균 로드 시간이 긴 이름 (느린 순)
    pub fn slowest_classes(&self, limit: usize) -> Vec<(String, u64)> {
        let per_type = self.per_type.read();
        let mut ranked: Vec<(String, u64)> = per_type
            .iter()
            .filter(|(_, s)| s.load_count > 0)
            .map(|(name, s)| (name.clone(), s.average_load_time_micros()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// 로드 성공이 많은 이름 (많은 순)
    pub fn most_loaded_classes(&self, limit: usize) -> Vec<(String, u64)> {
        let per_type = self.per_type.read();
        let mut ranked: Vec<(String, u64)> = per_type
            .iter()
            .filter(|(_, s)| s.load_count > 0)
            .map(|(name, s)| (name.clone(), s.load_count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// 에러가 한 번 이상 기록된 이름과 에러 수
    pub fn classes_with_errors(&self) -> Vec<(String, u64)> {
        let per_type = self.per_type.read();
        let mut failing: Vec<(String, u64)> = per_type
            .iter()
            .filter(|(_, s)| s.has_errors())
            .map(|(name, s)| (name.clone(), s.error_count))
            .collect();
        failing.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        failing
    }

    /// 최근 `limit` 개 이벤트 (시간순, 상세 추적이 꺼져 있으면 비어 있음)
    pub fn recent_events(&self, limit: usize) -> Vec<ClassLoadEvent> {
        let events = self.events.lock();
        let skip = events.len().saturating_sub(limit);
        events.iter().skip(skip).cloned().collect()
    }

    /// 평면 key/value 스냅샷
    pub fn summary(&self) -> MetricsSummary {
        let (tracked, with_errors) = {
            let per_type = self.per_type.read();
            (
                per_type.len(),
                per_type.values().filter(|s| s.has_errors()).count(),
            )
        };

        let mut summary = MetricsSummary::new();
        summary.insert("total_loads".into(), json!(self.total_loads()));
        summary.insert("total_errors".into(), json!(self.total_errors()));
        summary.insert("total_reloads".into(), json!(self.total_reloads()));
        summary.insert("cache_hits".into(), json!(self.cache_hits()));
        summary.insert("cache_misses".into(), json!(self.cache_misses()));
        summary.insert("cache_hit_ratio".into(), json!(self.cache_hit_ratio()));
        summary.insert(
            "average_load_time_micros".into(),
            json!(self.average_load_time()),
        );
        summary.insert("tracked_classes".into(), json!(tracked));
        summary.insert("classes_with_errors".into(), json!(with_errors));
        summary.insert(
            "detailed_tracking".into(),
            json!(self.is_detailed_tracking()),
        );
        summary.insert("buffered_events".into(), json!(self.events.lock().len()));
        summary
    }

    /// 요약 (pretty JSON)
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.summary())
    }

    /// 모든 카운터와 이름별 통계, 버퍼된 이벤트 초기화
    pub fn reset(&self) {
        self.total_loads.store(0, Ordering::Relaxed);
        self.total_errors.store(0, Ordering::Relaxed);
        self.total_reloads.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.per_type.write().clear();
        self.events.lock().clear();
    }

    // ========================================================================
    // 리포트
    // ========================================================================

    /// 사람이 읽는 리포트: 요약 후 top-N 목록
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Type Registry Metrics ===");
        for (key, value) in self.summary() {
            let _ = writeln!(out, "{:<26} {}", key, value);
        }

        let _ = writeln!(out, "\n--- Slowest types (avg micros) ---");
        for (name, micros) in self.slowest_classes(REPORT_TOP_N) {
            let _ = writeln!(out, "  {:<40} {}", name, micros);
        }

        let _ = writeln!(out, "\n--- Most loaded types ---");
        for (name, count) in self.most_loaded_classes(REPORT_TOP_N) {
            let _ = writeln!(out, "  {:<40} {}", name, count);
        }

        let failing = self.classes_with_errors();
        if !failing.is_empty() {
            let _ = writeln!(out, "\n--- Types with errors ---");
            for (name, count) in failing {
                let _ = writeln!(out, "  {:<40} {}", name, count);
            }
        }

        out
    }

    /// [`report`](Self::report) 를 stdout 에 출력
    pub fn print_report(&self) {
        let report = self.report();
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        let _ = lock.write_all(report.as_bytes());
        let _ = lock.flush();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(&MetricsConfig::default())
    }
}
