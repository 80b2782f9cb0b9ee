//! Error Types - Trellis 에러 타입
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Trellis Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;

/// Trellis 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 타입 레지스트리 관련
    // ========================================================================
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    #[error("Ambiguous match for '{name}': {}", candidates.join(", "))]
    AmbiguousMatch {
        name: String,
        candidates: Vec<String>,
    },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    // ========================================================================
    // 플러그인 관련
    // ========================================================================
    #[error("Plugin error: {0}")]
    Plugin(String),

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 리소스 관련
    // ========================================================================
    #[error("Resource error: {0}")]
    Resource(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 조회 실패 계열 에러인지 확인 (단일 조회에만 치명적)
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Error::TypeNotFound(_) | Error::AmbiguousMatch { .. })
    }

    /// 모호한 매칭 에러 생성 헬퍼
    pub fn ambiguous(name: impl Into<String>, candidates: Vec<String>) -> Self {
        Error::AmbiguousMatch {
            name: name.into(),
            candidates,
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
