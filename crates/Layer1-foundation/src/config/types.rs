//! Config Types - 레지스트리/리소스/메트릭 설정 타입

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// TrellisConfig - 통합 설정
// ============================================================================

/// Trellis 통합 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrellisConfig {
    /// 타입 레지스트리 설정
    #[serde(default)]
    pub registry: RegistryConfig,

    /// 리소스 리졸버 설정
    #[serde(default)]
    pub resources: ResourceConfig,

    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl TrellisConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// RegistryConfig
// ============================================================================

/// 연쇄 무효화 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationPolicy {
    /// 직접 의존자만 무효화 (1단계)
    #[default]
    Direct,
    /// 의존자의 의존자까지 전이적으로 무효화
    Transitive,
}

/// 타입 레지스트리 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistryConfig {
    /// 레지스트리 이름 (로그용)
    pub name: String,

    /// 스캔 범위 (패키지/모듈 prefix 목록, 비어있으면 전체)
    pub scan_scope: Vec<String>,

    /// 개발 모드 (fuzzy 매칭 + hot reload)
    pub development_mode: bool,

    /// hot reload 가능 판정 기준 (의존성 수 이하)
    pub hot_reload_threshold: usize,

    /// 연쇄 무효화 정책
    pub invalidation_policy: InvalidationPolicy,

    /// supertype/interface 를 의존성 엣지로 추가할지 여부
    pub include_supertype_edges: bool,

    /// 런타임 자체 네임스페이스 (사용자 정의 타입에서 제외)
    pub runtime_namespace: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            scan_scope: Vec::new(),
            development_mode: false,
            hot_reload_threshold: 3,
            invalidation_policy: InvalidationPolicy::Direct,
            include_supertype_edges: true,
            runtime_namespace: "core.".to_string(),
        }
    }
}

impl RegistryConfig {
    /// 개발 모드 설정으로 생성
    pub fn development(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            development_mode: true,
            ..Default::default()
        }
    }

    /// 스캔 범위 설정
    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scan_scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// 무효화 정책 설정
    pub fn with_invalidation_policy(mut self, policy: InvalidationPolicy) -> Self {
        self.invalidation_policy = policy;
        self
    }

    /// hot reload 기준 설정
    pub fn with_hot_reload_threshold(mut self, threshold: usize) -> Self {
        self.hot_reload_threshold = threshold;
        self
    }
}

// ============================================================================
// ResourceConfig
// ============================================================================

/// 리소스 리졸버 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceConfig {
    /// 프로젝트 루트 (상대 경로 기준)
    pub project_root: PathBuf,

    /// scheme 없는 이름을 찾을 디렉토리 (순서대로, "" = 루트)
    pub search_dirs: Vec<String>,

    /// 콘텐츠 캐시 TTL (초)
    pub cache_ttl_secs: u64,

    /// http(s) 요청 타임아웃 (초)
    pub http_timeout_secs: u64,

    /// `pkg:` scheme 용 패키지 루트
    pub package_roots: HashMap<String, PathBuf>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            search_dirs: vec![
                "lib".to_string(),
                "assets".to_string(),
                "resources".to_string(),
                String::new(),
            ],
            cache_ttl_secs: 300,
            http_timeout_secs: 30,
            package_roots: HashMap::new(),
        }
    }
}

impl ResourceConfig {
    /// 프로젝트 루트 지정
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// 패키지 루트 추가
    pub fn with_package(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.package_roots.insert(name.into(), root.into());
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// ============================================================================
// MetricsConfig
// ============================================================================

/// 메트릭 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsConfig {
    /// 상세 이벤트 추적 (시작 시 활성화 여부)
    pub detailed_tracking: bool,

    /// 이벤트 버퍼 최대 크기
    pub event_buffer_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            detailed_tracking: false,
            event_buffer_capacity: 1000,
        }
    }
}
