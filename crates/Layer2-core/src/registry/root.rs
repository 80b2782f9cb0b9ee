//! Root Registry - 런타임 기본 타입과 패키지 타입을 소유하는 부모 레지스트리

use super::matcher::{find_match, MatchOutcome};
use super::traits::TypeLookup;
use crate::reflect::{BuiltinTypeProvider, ScanScope, TypeDescriptor, TypeProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;
use trellis_foundation::{Error, MetricsCollector, Result};

/// 루트 레지스트리
///
/// 캐시는 조회 시점에 채워집니다. 캐시 hit/miss 는 호출자의 요청을 받은
/// 레지스트리가 기록하므로 여기서는 첫 발견 시 로드 메트릭만 기록합니다.
pub struct RootRegistry {
    /// 레지스트리 이름 (디버깅용)
    name: String,

    /// 타입 프로바이더 (등록 순서대로 검색)
    providers: Vec<Arc<dyn TypeProvider>>,

    /// simple/qualified name -> 디스크립터
    cache: RwLock<HashMap<String, Arc<TypeDescriptor>>>,

    /// 공유 메트릭
    metrics: Arc<MetricsCollector>,
}

impl RootRegistry {
    /// `core.` 기본 타입 프로바이더를 가진 루트 레지스트리
    pub fn new(metrics: Arc<MetricsCollector>) -> Self {
        Self::with_runtime_namespace("core.", metrics)
    }

    /// 런타임 네임스페이스 지정
    pub fn with_runtime_namespace(
        namespace: impl Into<String>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            name: "root".to_string(),
            providers: vec![Arc::new(BuiltinTypeProvider::new(namespace))],
            cache: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// 패키지 타입 프로바이더 추가 (기본 타입 다음 순서)
    pub fn with_provider(mut self, provider: Arc<dyn TypeProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 캐시된 타입 수 (simple name 기준)
    pub async fn cached_count(&self) -> usize {
        let cache = self.cache.read().await;
        let mut names: Vec<_> = cache.values().map(|d| d.qualified_name()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    pub async fn is_cached(&self, name: &str) -> bool {
        self.cache.read().await.contains_key(name)
    }

    fn discover(&self, name: &str) -> Option<TypeDescriptor> {
        let scope = ScanScope::unrestricted();
        self.providers.iter().find_map(|provider| {
            match find_match(provider.enumerate(&scope), name, false) {
                MatchOutcome::Found { descriptor, .. } => Some(descriptor),
                _ => None,
            }
        })
    }
}

#[async_trait]
impl TypeLookup for RootRegistry {
    fn registry_name(&self) -> &str {
        &self.name
    }

    async fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        if let Some(found) = self.cache.read().await.get(name) {
            return Ok(Arc::clone(found));
        }

        let start = Instant::now();
        let descriptor = self
            .discover(name)
            .ok_or_else(|| Error::TypeNotFound(name.to_string()))?;

        let mut cache = self.cache.write().await;
        // 다른 요청이 먼저 캐시했으면 로드를 다시 기록하지 않음
        if let Some(found) = cache.get(descriptor.simple_name()) {
            let found = Arc::clone(found);
            cache.insert(name.to_string(), Arc::clone(&found));
            return Ok(found);
        }

        let descriptor = Arc::new(descriptor);
        cache.insert(descriptor.simple_name().to_string(), Arc::clone(&descriptor));
        cache.insert(descriptor.qualified_name().to_string(), Arc::clone(&descriptor));
        cache.insert(name.to_string(), Arc::clone(&descriptor));
        drop(cache);

        self.metrics
            .record_load(descriptor.simple_name(), start.elapsed().as_micros() as u64);
        debug!(
            "[{}] Loaded {} as {}",
            self.name,
            name,
            descriptor.qualified_name()
        );

        Ok(descriptor)
    }
}
