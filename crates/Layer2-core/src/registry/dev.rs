//! Dev Registry - 스캔 범위 기반 디스커버리, 의존성 분석, hot reload
//!
//! 로컬 프로바이더에서 타입을 찾고 실패하면 부모 레지스트리로 위임합니다.
//! 캐시는 qualified name 으로 저장되므로 simple name 이 같은 타입도 공존합니다.
//! 멤버 타입은 simple name 으로 참조되므로 의존성 그래프와 hot reload 가능
//! 집합은 simple name 단위입니다.

use super::graph::{DependencyGraph, GraphSnapshot};
use super::matcher::{find_match, MatchKind, MatchOutcome};
use super::reload::{DiscoveryReport, HotReloadOutcome, RegistryStats};
use super::traits::{RegistryEvent, TypeLookup, TypeOrigin};
use crate::plugin::{PluginContext, PluginHost, RegistryPlugin};
use crate::reflect::{simple_name_of, ScanScope, TypeClassifier, TypeDescriptor, TypeProvider};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};
use trellis_foundation::{Error, InvalidationPolicy, MetricsCollector, RegistryConfig, Result};

// ============================================================================
// RegistryState - 락 하나로 보호되는 내부 상태
// ============================================================================

/// 캐시 항목
struct CachedType {
    descriptor: Arc<TypeDescriptor>,
    origin: TypeOrigin,
    /// 이 타입이 기여하는 의존성 대상 (simple name)
    targets: BTreeSet<String>,
}

#[derive(Default)]
struct RegistryState {
    /// qualified name -> 디스크립터
    cache: HashMap<String, CachedType>,

    /// simple name -> qualified name (발견 순서)
    by_simple: HashMap<String, Vec<String>>,

    /// 요청 이름 -> qualified name
    aliases: HashMap<String, String>,

    /// 로컬 타입 의존성 그래프 (simple name)
    graph: DependencyGraph,

    /// 어노테이션 태그 -> qualified name
    annotations: HashMap<String, BTreeSet<String>>,

    /// hot reload 가능 타입 (simple name)
    hot_reloadable: BTreeSet<String>,
}

impl RegistryState {
    /// 이름을 캐시 키로 변환: qualified name -> 별칭 -> simple name (로컬 우선)
    fn key_for(&self, name: &str) -> Option<&str> {
        if let Some((key, _)) = self.cache.get_key_value(name) {
            return Some(key.as_str());
        }
        if let Some(key) = self.aliases.get(name) {
            if self.cache.contains_key(key) {
                return Some(key.as_str());
            }
        }

        let keys = self.by_simple.get(name)?;
        keys.iter()
            .find(|key| {
                self.cache
                    .get(key.as_str())
                    .is_some_and(|c| c.origin == TypeOrigin::Local)
            })
            .or_else(|| keys.first())
            .map(String::as_str)
    }

    fn get(&self, name: &str) -> Option<&CachedType> {
        self.key_for(name).and_then(|key| self.cache.get(key))
    }

    /// 그래프에서 쓰는 simple name
    fn graph_name(&self, name: &str) -> String {
        match self.get(name) {
            Some(cached) => cached.descriptor.simple_name().to_string(),
            None => simple_name_of(name).unwrap_or(name).to_string(),
        }
    }

    /// 로컬 디스커버리 결과 저장 (같은 qualified name 의 기존 항목 교체)
    fn insert_local(
        &mut self,
        descriptor: TypeDescriptor,
        targets: BTreeSet<String>,
        requested: Option<&str>,
    ) -> Arc<TypeDescriptor> {
        let qualified = descriptor.qualified_name().to_string();
        let simple = descriptor.simple_name().to_string();
        self.unindex(&qualified);

        for annotation in descriptor.annotations() {
            self.annotations
                .entry(annotation.tag().to_string())
                .or_default()
                .insert(qualified.clone());
        }

        let descriptor = Arc::new(descriptor);
        self.cache.insert(
            qualified.clone(),
            CachedType {
                descriptor: Arc::clone(&descriptor),
                origin: TypeOrigin::Local,
                targets,
            },
        );
        self.index_simple(&simple, &qualified);
        if let Some(requested) = requested.filter(|r| *r != qualified) {
            self.aliases.insert(requested.to_string(), qualified);
        }

        self.rebuild_edges(&simple);
        descriptor
    }

    /// 부모에서 받은 디스크립터 저장 (그래프/인덱스 제외)
    fn insert_delegated(&mut self, requested: &str, descriptor: &Arc<TypeDescriptor>) {
        let qualified = descriptor.qualified_name().to_string();
        if !self.cache.contains_key(&qualified) {
            self.cache.insert(
                qualified.clone(),
                CachedType {
                    descriptor: Arc::clone(descriptor),
                    origin: TypeOrigin::Parent,
                    targets: BTreeSet::new(),
                },
            );
            self.index_simple(descriptor.simple_name(), &qualified);
        }
        if requested != qualified {
            self.aliases.insert(requested.to_string(), qualified);
        }
    }

    fn index_simple(&mut self, simple: &str, qualified: &str) {
        let keys = self.by_simple.entry(simple.to_string()).or_default();
        if !keys.iter().any(|k| k == qualified) {
            keys.push(qualified.to_string());
        }
    }

    /// simple name 노드의 엣지를 해당 이름의 로컬 타입들로부터 다시 구성
    fn rebuild_edges(&mut self, simple: &str) {
        let locals: Vec<&CachedType> = self
            .by_simple
            .get(simple)
            .into_iter()
            .flatten()
            .filter_map(|key| self.cache.get(key))
            .filter(|c| c.origin == TypeOrigin::Local)
            .collect();

        if locals.is_empty() {
            self.graph.remove_node(simple);
            self.hot_reloadable.remove(simple);
            return;
        }

        let targets: BTreeSet<String> = locals
            .iter()
            .flat_map(|c| c.targets.iter().cloned())
            .collect();
        self.graph.clear_outgoing(simple);
        self.graph.add_node(simple.to_string());
        for target in targets {
            self.graph.add_edge(simple.to_string(), target);
        }
    }

    /// 어노테이션 인덱스에서 제거
    fn unindex(&mut self, qualified: &str) {
        let Some(existing) = self.cache.get(qualified) else {
            return;
        };
        for annotation in existing.descriptor.annotations() {
            if let Some(names) = self.annotations.get_mut(annotation.tag()) {
                names.remove(qualified);
                if names.is_empty() {
                    self.annotations.remove(annotation.tag());
                }
            }
        }
    }

    /// 캐시, 별칭, simple name 인덱스, 어노테이션 인덱스에서 제거하고 엣지 재구성
    fn remove(&mut self, qualified: &str) -> bool {
        self.unindex(qualified);
        let Some(removed) = self.cache.remove(qualified) else {
            return false;
        };
        self.aliases.retain(|_, target| target != qualified);

        let simple = removed.descriptor.simple_name();
        if let Some(keys) = self.by_simple.get_mut(simple) {
            keys.retain(|k| k != qualified);
            if keys.is_empty() {
                self.by_simple.remove(simple);
            }
        }
        if removed.origin == TypeOrigin::Local {
            self.rebuild_edges(simple);
        }
        true
    }

    /// simple name 에 속한 로컬 타입 모두 제거
    fn remove_local_named(&mut self, simple: &str) -> bool {
        let keys: Vec<String> = self
            .by_simple
            .get(simple)
            .into_iter()
            .flatten()
            .filter(|key| {
                self.cache
                    .get(key.as_str())
                    .is_some_and(|c| c.origin == TypeOrigin::Local)
            })
            .cloned()
            .collect();

        let mut removed = false;
        for key in keys {
            removed |= self.remove(&key);
        }
        removed
    }

    fn recompute_hot_reloadable(&mut self, threshold: usize) {
        let graph = &self.graph;
        self.hot_reloadable = self
            .cache
            .values()
            .filter(|cached| cached.origin == TypeOrigin::Local)
            .map(|cached| cached.descriptor.simple_name())
            .filter(|name| graph.out_degree(name) <= threshold)
            .map(str::to_string)
            .collect();
    }

    /// supertype 체인(캐시 내)과 각 단계의 interface 로 할당 가능 여부 판단
    fn is_assignable<'a>(&'a self, descriptor: &'a TypeDescriptor, base: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(descriptor);

        while let Some(desc) = current {
            if desc
                .interfaces()
                .iter()
                .any(|i| simple_name_of(i) == Some(base))
            {
                return true;
            }
            let Some(supertype) = desc.supertype() else {
                return false;
            };
            if simple_name_of(supertype) == Some(base) {
                return true;
            }
            if !visited.insert(supertype) {
                return false;
            }
            current = self
                .get(supertype)
                .or_else(|| simple_name_of(supertype).and_then(|s| self.get(s)))
                .map(|c| c.descriptor.as_ref());
        }

        false
    }
}

// ============================================================================
// DevRegistry
// ============================================================================

/// 개발용 자식 레지스트리
///
/// 상태는 하나의 `RwLock` 안에 있고 플러그인 훅은 락 없이 호출됩니다.
/// `discover_all` 과 `hot_reload` 는 호출자가 직렬화해야 합니다.
pub struct DevRegistry {
    /// 레지스트리 이름 (디버깅용)
    name: String,

    /// 설정
    config: RegistryConfig,

    /// 온디맨드 디스커버리 범위
    scope: ScanScope,

    /// 멤버 타입 분류기
    classifier: TypeClassifier,

    /// 로컬 타입 프로바이더
    providers: Vec<Arc<dyn TypeProvider>>,

    /// 위임 대상
    parent: Option<Arc<dyn TypeLookup>>,

    /// 캐시 / 그래프 / 인덱스
    state: RwLock<RegistryState>,

    /// 플러그인
    plugins: PluginHost,

    /// 공유 메트릭
    metrics: Arc<MetricsCollector>,

    /// 이벤트 채널
    event_tx: broadcast::Sender<RegistryEvent>,
}

impl DevRegistry {
    /// 새 레지스트리 생성
    pub fn new(config: RegistryConfig, metrics: Arc<MetricsCollector>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            name: config.name.clone(),
            scope: ScanScope::new(config.scan_scope.iter().cloned()),
            classifier: TypeClassifier::new(config.runtime_namespace.clone()),
            config,
            providers: Vec::new(),
            parent: None,
            state: RwLock::new(RegistryState::default()),
            plugins: PluginHost::new(),
            metrics,
            event_tx,
        }
    }

    /// 로컬 프로바이더 추가 (등록 순서대로 검색)
    pub fn with_provider(mut self, provider: Arc<dyn TypeProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// 부모 레지스트리 지정
    pub fn with_parent(mut self, parent: Arc<dyn TypeLookup>) -> Self {
        self.parent = Some(parent);
        self
    }

    // ========================================================================
    // 플러그인
    // ========================================================================

    /// 플러그인 등록 (`initialize` 호출)
    pub async fn register_plugin(&self, plugin: Arc<dyn RegistryPlugin>) -> Result<()> {
        let ctx = PluginContext::new(
            self.name.clone(),
            self.config.development_mode,
            self.scope.clone(),
            Arc::clone(&self.metrics),
        );
        self.plugins.register(plugin, &ctx).await
    }

    /// 플러그인 해제 (`dispose` 호출)
    pub async fn unregister_plugin(&self, name: &str) -> Result<()> {
        self.plugins.unregister(name).await
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 타입 조회: 캐시 -> 로컬 디스커버리 -> 부모 위임
    pub async fn resolve(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(found) = self.cached(name).await {
            self.metrics.record_cache_hit();
            debug!("[{}] Cache hit: {}", self.name, name);
            return Ok(found);
        }
        self.metrics.record_cache_miss();
        debug!("[{}] Cache miss: {}", self.name, name);

        let ambiguity = match self.discover_one(name, self.config.development_mode).await {
            Ok(descriptor) => return Ok(descriptor),
            Err(e @ Error::AmbiguousMatch { .. }) => Some(e),
            Err(_) => None,
        };

        if let Some(parent) = &self.parent {
            match parent.lookup(name).await {
                Ok(descriptor) => {
                    self.state
                        .write()
                        .await
                        .insert_delegated(name, &descriptor);
                    debug!(
                        "[{}] Delegated {} to {}",
                        self.name,
                        name,
                        parent.registry_name()
                    );
                    self.emit(RegistryEvent::Delegated {
                        name: descriptor.simple_name().to_string(),
                        parent: parent.registry_name().to_string(),
                    });
                    return Ok(descriptor);
                }
                Err(e) => debug!("[{}] Parent lookup failed: {}", self.name, e),
            }
        }

        let error = ambiguity.unwrap_or_else(|| Error::TypeNotFound(name.to_string()));
        self.metrics.record_error(name, &error);
        Err(error)
    }

    /// 범위 내 모든 타입 발견 (멱등)
    pub async fn discover_all(&self, scope: &ScanScope) -> DiscoveryReport {
        let start = Instant::now();
        let mut seen = HashSet::new();
        let candidates: Vec<TypeDescriptor> = self
            .providers
            .iter()
            .flat_map(|provider| provider.enumerate(scope))
            .filter(|t| {
                let first = seen.insert(t.qualified_name().to_string());
                if !first {
                    debug!(
                        "[{}] Skipping duplicate {} from a later provider",
                        self.name,
                        t.qualified_name()
                    );
                }
                first
            })
            .collect();

        let mut discovered = 0;
        for descriptor in candidates {
            let name = descriptor.simple_name().to_string();
            self.plugins.before_load(&name).await;

            let load_start = Instant::now();
            let targets = self.dependency_targets(&descriptor);
            let descriptor = self
                .state
                .write()
                .await
                .insert_local(descriptor, targets, None);
            self.metrics
                .record_load(&name, load_start.elapsed().as_micros() as u64);

            self.plugins.after_load(&name, Some(&descriptor)).await;
            self.emit(RegistryEvent::discovered(&descriptor));
            discovered += 1;
        }

        let hot_reloadable = {
            let mut state = self.state.write().await;
            state.recompute_hot_reloadable(self.config.hot_reload_threshold);
            self.check_edge_targets(&state);
            state.hot_reloadable.len()
        };

        let report = DiscoveryReport {
            discovered,
            hot_reloadable,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "[{}] Discovered {} types in {}ms ({} hot-reloadable)",
            self.name, report.discovered, report.duration_ms, report.hot_reloadable
        );
        self.emit(RegistryEvent::BulkDiscovered { count: discovered });
        report
    }

    /// 설정된 스캔 범위로 `discover_all`
    pub async fn discover_configured_scope(&self) -> DiscoveryReport {
        let scope = self.scope.clone();
        self.discover_all(&scope).await
    }

    /// 어노테이션 태그가 붙은 로컬 타입 (이름순)
    pub async fn types_annotated_with(&self, tag: &str) -> Vec<Arc<TypeDescriptor>> {
        let state = self.state.read().await;
        state
            .annotations
            .get(tag)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| state.cache.get(name))
                    .map(|cached| Arc::clone(&cached.descriptor))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `base` 에 할당 가능한 캐시된 타입 (base 자신 제외, 이름순)
    pub async fn subtypes_of(&self, base: &str) -> Vec<Arc<TypeDescriptor>> {
        let base = simple_name_of(base).unwrap_or(base);
        let state = self.state.read().await;
        let mut subtypes: Vec<Arc<TypeDescriptor>> = state
            .cache
            .values()
            .filter(|cached| cached.descriptor.simple_name() != base)
            .filter(|cached| state.is_assignable(&cached.descriptor, base))
            .map(|cached| Arc::clone(&cached.descriptor))
            .collect();
        subtypes.sort_by(|a, b| {
            a.simple_name()
                .cmp(b.simple_name())
                .then_with(|| a.qualified_name().cmp(b.qualified_name()))
        });
        subtypes
    }

    // ========================================================================
    // 무효화 / hot reload (개발 모드 전용)
    // ========================================================================

    /// 단일 타입 무효화
    pub async fn invalidate(&self, name: &str) -> Result<bool> {
        self.require_development("invalidate")?;

        let removed = {
            let mut state = self.state.write().await;
            let key = state.key_for(name).map(str::to_string);
            match key {
                Some(key) => {
                    let simple = state.graph_name(&key);
                    state.remove(&key);
                    state.recompute_hot_reloadable(self.config.hot_reload_threshold);
                    Some(simple)
                }
                None => None,
            }
        };

        match removed {
            Some(simple) => {
                debug!("[{}] Invalidated: {}", self.name, simple);
                self.emit(RegistryEvent::invalidated(simple));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 타입과 의존자 무효화 (`InvalidationPolicy` 에 따라 1단계 또는 전이적)
    pub async fn invalidate_cascading(&self, name: &str) -> Result<Vec<String>> {
        self.require_development("invalidate_cascading")?;

        let invalidated = {
            let mut state = self.state.write().await;
            let root_key = state.key_for(name).map(str::to_string);
            let root = state.graph_name(name);
            let dependents: Vec<String> = match self.config.invalidation_policy {
                InvalidationPolicy::Direct => state.graph.dependents(&root).into_iter().collect(),
                InvalidationPolicy::Transitive => state.graph.transitive_dependents(&root),
            };

            let mut invalidated = Vec::new();
            if root_key.is_some_and(|key| state.remove(&key)) {
                invalidated.push(root);
            }
            for dependent in dependents {
                if state.remove_local_named(&dependent) {
                    invalidated.push(dependent);
                }
            }
            state.recompute_hot_reloadable(self.config.hot_reload_threshold);
            invalidated
        };

        if !invalidated.is_empty() {
            info!(
                "[{}] Invalidated {} ({} types): {}",
                self.name,
                name,
                invalidated.len(),
                invalidated.join(", ")
            );
        }
        for target in &invalidated {
            self.emit(RegistryEvent::invalidated(target.clone()));
        }
        Ok(invalidated)
    }

    /// hot reload: 연쇄 무효화 후 프로바이더에서 재발견
    pub async fn hot_reload(&self, name: &str) -> Result<HotReloadOutcome> {
        self.require_development("hot_reload")?;

        let target = {
            let state = self.state.read().await;
            state
                .get(name)
                .filter(|cached| cached.origin == TypeOrigin::Local)
                .map(|cached| &cached.descriptor)
                .filter(|d| state.hot_reloadable.contains(d.simple_name()))
                .map(|d| (d.qualified_name().to_string(), d.simple_name().to_string()))
        };
        let Some((qualified, target)) = target else {
            warn!("[{}] {} is not hot-reloadable", self.name, name);
            return Ok(HotReloadOutcome::NotReloadable {
                name: name.to_string(),
            });
        };

        let start = Instant::now();
        let invalidated = self.invalidate_cascading(&qualified).await?;

        match self.rediscover(&qualified).await {
            Ok(descriptor) => {
                self.metrics.record_reload(&target);
                self.plugins.on_reloaded(&target, &descriptor).await;

                let duration_ms = start.elapsed().as_millis() as u64;
                info!(
                    "[{}] Hot reloaded {} in {}ms ({} invalidated)",
                    self.name,
                    target,
                    duration_ms,
                    invalidated.len()
                );
                self.emit(RegistryEvent::Reloaded {
                    name: target,
                    invalidated: invalidated.clone(),
                });
                Ok(HotReloadOutcome::Reloaded {
                    descriptor,
                    invalidated,
                    duration_ms,
                })
            }
            Err(e) => {
                error!("[{}] Failed to re-discover {}: {}", self.name, target, e);
                self.metrics.record_error(&target, &e);
                self.emit(RegistryEvent::ReloadFailed {
                    name: target,
                    error: e.to_string(),
                });
                Ok(HotReloadOutcome::Failed {
                    invalidated,
                    error: e.to_string(),
                })
            }
        }
    }

    /// 전체 초기화
    pub async fn clear(&self) {
        *self.state.write().await = RegistryState::default();
        info!("[{}] Cleared", self.name);
        self.emit(RegistryEvent::Cleared);
    }

    // ========================================================================
    // 상태 조회
    // ========================================================================

    /// 의존성 그래프 스냅샷
    pub async fn dependency_graph(&self) -> GraphSnapshot {
        self.state.read().await.graph.snapshot()
    }

    pub async fn dependencies_of(&self, name: &str) -> BTreeSet<String> {
        let state = self.state.read().await;
        state.graph.dependencies(&state.graph_name(name))
    }

    pub async fn dependents_of(&self, name: &str) -> BTreeSet<String> {
        let state = self.state.read().await;
        state.graph.dependents(&state.graph_name(name))
    }

    /// hot reload 가능 집합 (복사본)
    pub async fn hot_reloadable_set(&self) -> BTreeSet<String> {
        self.state.read().await.hot_reloadable.clone()
    }

    pub async fn is_cached(&self, name: &str) -> bool {
        self.state.read().await.get(name).is_some()
    }

    /// 캐시 항목 출처
    pub async fn origin_of(&self, name: &str) -> Option<TypeOrigin> {
        self.state.read().await.get(name).map(|c| c.origin)
    }

    /// 캐시된 qualified name 목록 (정렬됨)
    pub async fn cached_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut names: Vec<String> = state.cache.keys().cloned().collect();
        names.sort();
        names
    }

    /// 레지스트리 통계
    pub async fn stats(&self) -> RegistryStats {
        let plugins = self.plugins.len().await;
        let state = self.state.read().await;
        let local = state
            .cache
            .values()
            .filter(|c| c.origin == TypeOrigin::Local)
            .count();

        RegistryStats {
            name: self.name.clone(),
            cached: state.cache.len(),
            local,
            delegated: state.cache.len() - local,
            graph_nodes: state.graph.node_count(),
            graph_edges: state.graph.edge_count(),
            annotation_tags: state.annotations.len(),
            hot_reloadable: state.hot_reloadable.len(),
            plugins,
        }
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.event_tx.subscribe()
    }

    pub fn plugins(&self) -> &PluginHost {
        &self.plugins
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn scope(&self) -> &ScanScope {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // 내부 헬퍼
    // ========================================================================

    async fn cached(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        let state = self.state.read().await;
        state.get(name).map(|c| Arc::clone(&c.descriptor))
    }

    /// 설정된 범위에서 한 타입을 찾아 캐시 (플러그인 훅 포함)
    ///
    /// 요청 이름은 별칭으로 남아 같은 이름의 다음 조회는 캐시 hit 입니다.
    async fn discover_one(&self, name: &str, fuzzy: bool) -> Result<Arc<TypeDescriptor>> {
        self.plugins.before_load(name).await;
        let start = Instant::now();

        let outcome = find_match(
            self.providers
                .iter()
                .flat_map(|provider| provider.enumerate(&self.scope)),
            name,
            fuzzy,
        );
        self.finish_discovery(name, outcome, start).await
    }

    /// qualified name 이 정확히 일치하는 타입을 범위 제한 없이 재발견
    ///
    /// `discover_all` 이 설정보다 넓은 범위로 찾은 타입도 다시 불러옵니다.
    async fn rediscover(&self, qualified: &str) -> Result<Arc<TypeDescriptor>> {
        self.plugins.before_load(qualified).await;
        let start = Instant::now();

        let unrestricted = ScanScope::unrestricted();
        let outcome = self
            .providers
            .iter()
            .flat_map(|provider| provider.enumerate(&unrestricted))
            .find(|t| t.qualified_name() == qualified)
            .map(|descriptor| MatchOutcome::Found {
                descriptor,
                kind: MatchKind::Qualified,
            })
            .unwrap_or(MatchOutcome::NotFound);
        self.finish_discovery(qualified, outcome, start).await
    }

    async fn finish_discovery(
        &self,
        name: &str,
        outcome: MatchOutcome,
        start: Instant,
    ) -> Result<Arc<TypeDescriptor>> {
        let result = match outcome {
            MatchOutcome::Found { descriptor, kind } => {
                if kind.is_fuzzy() {
                    info!(
                        "[{}] Fuzzy match: {} -> {}",
                        self.name,
                        name,
                        descriptor.qualified_name()
                    );
                }
                let targets = self.dependency_targets(&descriptor);
                let descriptor = {
                    let mut state = self.state.write().await;
                    let descriptor = state.insert_local(descriptor, targets, Some(name));
                    state.recompute_hot_reloadable(self.config.hot_reload_threshold);
                    descriptor
                };
                self.metrics.record_load(
                    descriptor.simple_name(),
                    start.elapsed().as_micros() as u64,
                );
                debug!(
                    "[{}] Discovered {} ({})",
                    self.name,
                    descriptor.simple_name(),
                    descriptor.qualified_name()
                );
                self.emit(RegistryEvent::discovered(&descriptor));
                Ok(descriptor)
            }
            MatchOutcome::Ambiguous(candidates) => {
                warn!(
                    "[{}] Ambiguous match for {}: {}",
                    self.name,
                    name,
                    candidates.join(", ")
                );
                Err(Error::ambiguous(name, candidates))
            }
            MatchOutcome::NotFound => Err(Error::TypeNotFound(name.to_string())),
        };

        self.plugins
            .after_load(name, result.as_ref().ok().map(|d| d.as_ref()))
            .await;
        result
    }

    /// 멤버 타입 + supertype/interface 에서 의존성 대상 추출
    fn dependency_targets(&self, descriptor: &TypeDescriptor) -> BTreeSet<String> {
        let own = descriptor.simple_name();

        let mut targets: BTreeSet<String> = descriptor
            .members()
            .iter()
            .filter_map(|member| member.type_name())
            .filter_map(|type_name| self.classifier.user_defined(type_name))
            .filter(|target| target != own)
            .collect();

        if self.config.include_supertype_edges {
            let parents = descriptor
                .supertype()
                .into_iter()
                .chain(descriptor.interfaces().iter().map(String::as_str));
            for parent in parents {
                if let Some(target) = simple_name_of(parent).filter(|t| *t != own) {
                    targets.insert(target.to_string());
                }
            }
        }

        targets
    }

    /// 엣지 대상이 발견 가능한지 검사 (위반은 경고만)
    fn check_edge_targets(&self, state: &RegistryState) {
        let unrestricted = ScanScope::unrestricted();
        for target in state.graph.edge_targets() {
            if state.get(target).is_some() {
                continue;
            }
            let discoverable = self.providers.iter().any(|provider| {
                provider
                    .enumerate(&unrestricted)
                    .any(|t| t.simple_name() == target)
            });
            if !discoverable {
                let dependents: Vec<String> = state.graph.dependents(target).into_iter().collect();
                warn!(
                    "[{}] Dependency {} is not discoverable (used by {})",
                    self.name,
                    target,
                    dependents.join(", ")
                );
            }
        }
    }

    fn require_development(&self, operation: &str) -> Result<()> {
        if self.config.development_mode {
            Ok(())
        } else {
            Err(Error::UnsupportedOperation(format!(
                "{} requires development mode",
                operation
            )))
        }
    }

    fn emit(&self, event: RegistryEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[async_trait]
impl TypeLookup for DevRegistry {
    fn registry_name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.resolve(name).await
    }
}
