//! Plugin traits - 레지스트리 플러그인 인터페이스

use crate::reflect::{ScanScope, TypeDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use trellis_foundation::{MetricsCollector, Result};

// ============================================================================
// PluginCapability - 플러그인 기능 열거
// ============================================================================

/// 플러그인이 제공할 수 있는 기능
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginCapability {
    /// 로드 전후 훅 처리
    ObserveLoads,

    /// hot reload 알림 수신
    HotReloadAware,

    /// 메트릭 보고
    ReportMetrics,
}

// ============================================================================
// PluginContext - 플러그인에 제공되는 컨텍스트
// ============================================================================

/// 플러그인 컨텍스트 - 초기화 시 플러그인이 레지스트리 정보를 얻는 인터페이스
#[derive(Clone)]
pub struct PluginContext {
    /// 플러그인을 등록한 레지스트리 이름
    registry_name: String,

    /// 개발 모드 여부
    development_mode: bool,

    /// 레지스트리 스캔 범위
    scan_scope: ScanScope,

    /// 공유 메트릭
    metrics: Arc<MetricsCollector>,
}

impl PluginContext {
    /// 새 컨텍스트 생성
    pub fn new(
        registry_name: impl Into<String>,
        development_mode: bool,
        scan_scope: ScanScope,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            registry_name: registry_name.into(),
            development_mode,
            scan_scope,
            metrics,
        }
    }

    pub fn registry_name(&self) -> &str {
        &self.registry_name
    }

    pub fn is_development_mode(&self) -> bool {
        self.development_mode
    }

    pub fn scan_scope(&self) -> &ScanScope {
        &self.scan_scope
    }

    /// 메트릭 수집기 접근
    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("registry_name", &self.registry_name)
            .field("development_mode", &self.development_mode)
            .field("scan_scope", &self.scan_scope)
            .finish()
    }
}

// ============================================================================
// RegistryPlugin Trait - 모든 플러그인이 구현해야 하는 인터페이스
// ============================================================================

/// 레지스트리 플러그인 트레이트
///
/// 모든 훅은 기본 구현이 있으므로 필요한 것만 재정의합니다.
/// 훅이 에러를 반환하거나 panic 해도 로드/리로드는 중단되지 않습니다.
#[async_trait]
pub trait RegistryPlugin: Send + Sync {
    /// 플러그인 이름 (고유)
    fn name(&self) -> &str;

    /// 플러그인이 제공하는 기능 목록
    fn capabilities(&self) -> Vec<PluginCapability> {
        vec![]
    }

    /// 등록 시 호출 (실패하면 등록 거부)
    async fn initialize(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 디스커버리 시도 전
    async fn before_load(&self, _name: &str) -> Result<()> {
        Ok(())
    }

    /// 디스커버리 시도 후 (실패 시 `descriptor` 는 `None`)
    async fn after_load(&self, _name: &str, _descriptor: Option<&TypeDescriptor>) -> Result<()> {
        Ok(())
    }

    /// 등록 해제 시 호출
    async fn dispose(&self) -> Result<()> {
        Ok(())
    }

    /// hot reload 알림을 받으려면 `Some(self)` 반환
    ///
    /// 등록 시 한 번만 호출됩니다.
    fn hot_reload_hook(self: Arc<Self>) -> Option<Arc<dyn HotReloadAware>> {
        None
    }
}

/// hot reload 알림을 받는 플러그인
#[async_trait]
pub trait HotReloadAware: Send + Sync {
    /// 재발견된 디스크립터와 함께 호출
    async fn on_reloaded(&self, name: &str, descriptor: &TypeDescriptor) -> Result<()>;
}
