//! Resource Locator - 리소스 위치와 참조 문자열 파싱
//!
//! 참조 문법:
//! - `pkg:<package>/<path>`
//! - `builtin:<name>`
//! - `file:<path>` (절대 경로가 아니면 프로젝트 루트 기준)
//! - `http://...` / `https://...`
//! - 그 외는 bare name 이며 설정된 디렉토리에서 검색

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 리소스 스킴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    File,
    Package,
    Builtin,
    Http,
}

impl Scheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::File => "file:",
            Self::Package => "pkg:",
            Self::Builtin => "builtin:",
            Self::Http => "http:",
        }
    }
}

/// 로드 가능한 구체적인 리소스 위치
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Locator {
    /// 파일 시스템 경로 (프로젝트 루트와 결합됨)
    File { path: PathBuf },
    /// 설정된 패키지 루트 내부 경로
    Package { package: String, path: String },
    /// 생성 시 등록된 메모리 리소스
    Builtin { name: String },
    /// 원격 http(s) URL
    Http { url: String },
}

impl Locator {
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::File { .. } => Scheme::File,
            Self::Package { .. } => Scheme::Package,
            Self::Builtin { .. } => Scheme::Builtin,
            Self::Http { .. } => Scheme::Http,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path } => write!(f, "file:{}", path.display()),
            Self::Package { package, path } => write!(f, "pkg:{}/{}", package, path),
            Self::Builtin { name } => write!(f, "builtin:{}", name),
            Self::Http { url } => write!(f, "{}", url),
        }
    }
}

/// 참조를 스킴과 나머지 부분으로 분리
///
/// http(s) 참조는 전체 URL 을 나머지로 유지합니다.
pub fn split_scheme(reference: &str) -> (Option<Scheme>, &str) {
    let reference = reference.trim();
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return (Some(Scheme::Http), reference);
    }
    if let Some(rest) = reference.strip_prefix("pkg:") {
        return (Some(Scheme::Package), rest);
    }
    if let Some(rest) = reference.strip_prefix("builtin:") {
        return (Some(Scheme::Builtin), rest);
    }
    if let Some(rest) = reference.strip_prefix("file:") {
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        return (Some(Scheme::File), rest);
    }
    (None, reference)
}
