//! Registry Traits - 레지스트리 간 조회 인터페이스와 변경 이벤트

use crate::reflect::TypeDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use trellis_foundation::Result;

// ============================================================================
// TypeLookup - 부모 위임용 조회 trait
// ============================================================================

/// 이름으로 타입을 조회할 수 있는 레지스트리
///
/// 자식 레지스트리는 로컬 디스커버리에 실패하면 부모의 `lookup` 으로 위임합니다.
#[async_trait]
pub trait TypeLookup: Send + Sync {
    /// 레지스트리 이름 (로그용)
    fn registry_name(&self) -> &str;

    /// 타입 조회 (없으면 `Error::TypeNotFound`)
    async fn lookup(&self, name: &str) -> Result<Arc<TypeDescriptor>>;
}

// ============================================================================
// TypeOrigin - 캐시 항목 출처
// ============================================================================

/// 캐시된 디스크립터의 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOrigin {
    /// 로컬 프로바이더에서 발견 (그래프 분석 대상)
    Local,
    /// 부모 레지스트리에서 위임받음
    Parent,
}

// ============================================================================
// RegistryEvent - 레지스트리 변경 이벤트
// ============================================================================

/// 레지스트리 변경 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// 로컬 디스커버리 성공
    Discovered { name: String, qualified_name: String },

    /// 부모에서 위임받아 캐시됨
    Delegated { name: String, parent: String },

    /// 일괄 디스커버리 완료
    BulkDiscovered { count: usize },

    /// 캐시에서 제거됨
    Invalidated { name: String },

    /// hot reload 성공
    Reloaded {
        name: String,
        invalidated: Vec<String>,
    },

    /// hot reload 재발견 실패
    ReloadFailed { name: String, error: String },

    /// 전체 초기화
    Cleared,
}

impl RegistryEvent {
    /// 디스커버리 이벤트 생성
    pub fn discovered(descriptor: &TypeDescriptor) -> Self {
        Self::Discovered {
            name: descriptor.simple_name().to_string(),
            qualified_name: descriptor.qualified_name().to_string(),
        }
    }

    /// 무효화 이벤트 생성
    pub fn invalidated(name: impl Into<String>) -> Self {
        Self::Invalidated { name: name.into() }
    }

    /// 이벤트 대상 타입 이름
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Discovered { name, .. } => Some(name),
            Self::Delegated { name, .. } => Some(name),
            Self::Invalidated { name } => Some(name),
            Self::Reloaded { name, .. } => Some(name),
            Self::ReloadFailed { name, .. } => Some(name),
            _ => None,
        }
    }
}
