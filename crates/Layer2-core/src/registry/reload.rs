//! Hot reload / discovery 결과 타입

use crate::reflect::TypeDescriptor;
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// HotReloadOutcome
// ============================================================================

/// hot reload 결과
///
/// 재발견 실패도 `Ok(Failed)` 로 반환됩니다. `Err` 는 개발 모드가 아닐 때만.
#[derive(Debug, Clone)]
pub enum HotReloadOutcome {
    /// 무효화 후 재발견 성공
    Reloaded {
        descriptor: Arc<TypeDescriptor>,
        /// 무효화된 타입 (자기 자신 포함)
        invalidated: Vec<String>,
        duration_ms: u64,
    },

    /// hot reload 가능 집합에 없음 (아무것도 변경되지 않음)
    NotReloadable { name: String },

    /// 무효화는 되었으나 재발견 실패 (기존 항목은 제거된 상태)
    Failed {
        invalidated: Vec<String>,
        error: String,
    },
}

impl HotReloadOutcome {
    pub fn is_reloaded(&self) -> bool {
        matches!(self, Self::Reloaded { .. })
    }

    /// 무효화된 타입 목록
    pub fn invalidated(&self) -> &[String] {
        match self {
            Self::Reloaded { invalidated, .. } | Self::Failed { invalidated, .. } => invalidated,
            Self::NotReloadable { .. } => &[],
        }
    }

    /// 재발견된 디스크립터
    pub fn descriptor(&self) -> Option<&Arc<TypeDescriptor>> {
        match self {
            Self::Reloaded { descriptor, .. } => Some(descriptor),
            _ => None,
        }
    }
}

// ============================================================================
// DiscoveryReport
// ============================================================================

/// 일괄 디스커버리 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// 발견(캐시)된 타입 수
    pub discovered: usize,
    /// 디스커버리 후 hot reload 가능 집합 크기
    pub hot_reloadable: usize,
    /// 소요 시간 (밀리초)
    pub duration_ms: u64,
}

// ============================================================================
// RegistryStats
// ============================================================================

/// 레지스트리 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// 레지스트리 이름
    pub name: String,
    /// 캐시된 전체 타입 수
    pub cached: usize,
    /// 로컬에서 발견된 타입 수
    pub local: usize,
    /// 부모에서 위임받은 타입 수
    pub delegated: usize,
    /// 그래프 노드 수
    pub graph_nodes: usize,
    /// 그래프 엣지 수
    pub graph_edges: usize,
    /// 인덱싱된 어노테이션 태그 수
    pub annotation_tags: usize,
    /// hot reload 가능 타입 수
    pub hot_reloadable: usize,
    /// 등록된 플러그인 수
    pub plugins: usize,
}

impl std::fmt::Display for RegistryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} cached ({} local, {} delegated), {} nodes, {} edges, {} hot-reloadable, {} plugins",
            self.name,
            self.cached,
            self.local,
            self.delegated,
            self.graph_nodes,
            self.graph_edges,
            self.hot_reloadable,
            self.plugins
        )
    }
}
