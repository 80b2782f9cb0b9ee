//! Scheme Resolvers - 스킴별 리소스 해석기

use super::locator::{Locator, Scheme};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use trellis_foundation::{Error, Result};

/// 한 스킴의 참조 해석 및 로드
#[async_trait]
pub trait SchemeResolver: Send + Sync {
    fn scheme(&self) -> Scheme;

    /// 참조 해석 (스킴 접두사 제거됨)
    async fn resolve(&self, reference: &str) -> Option<Locator>;

    /// glob 패턴 확장 (스킴 접두사 제거됨)
    fn resolve_all(&self, pattern: &str) -> Vec<Locator>;

    /// 리소스 내용 읽기
    async fn load(&self, locator: &Locator) -> Result<Vec<u8>>;

    async fn exists(&self, locator: &Locator) -> bool;
}

fn wrong_scheme(expected: Scheme, locator: &Locator) -> Error {
    Error::Resource(format!(
        "{} cannot be loaded by the {:?} resolver",
        locator, expected
    ))
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// `root` 아래 glob, `root` 기준 상대 경로 반환
fn glob_relative(root: &Path, pattern: &str) -> Vec<PathBuf> {
    let Some(root_str) = root.to_str() else {
        return Vec::new();
    };
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(root_str.trim_end_matches('/')),
        pattern
    );
    let entries = match glob::glob(&full) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Invalid glob pattern {}: {}", pattern, e);
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

// ============================================================================
// file:
// ============================================================================

/// 프로젝트 루트 기준 파일 시스템 리소스
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl SchemeResolver for FileResolver {
    fn scheme(&self) -> Scheme {
        Scheme::File
    }

    async fn resolve(&self, reference: &str) -> Option<Locator> {
        let path = self.path_for(reference);
        is_file(&path).await.then_some(Locator::File { path })
    }

    fn resolve_all(&self, pattern: &str) -> Vec<Locator> {
        if Path::new(pattern).is_absolute() {
            return glob::glob(pattern)
                .map(|entries| {
                    entries
                        .filter_map(|entry| entry.ok())
                        .filter(|path| path.is_file())
                        .map(|path| Locator::File { path })
                        .collect()
                })
                .unwrap_or_default();
        }
        glob_relative(&self.root, pattern)
            .into_iter()
            .map(|relative| Locator::File {
                path: self.root.join(relative),
            })
            .collect()
    }

    async fn load(&self, locator: &Locator) -> Result<Vec<u8>> {
        match locator {
            Locator::File { path } => Ok(tokio::fs::read(path).await?),
            other => Err(wrong_scheme(Scheme::File, other)),
        }
    }

    async fn exists(&self, locator: &Locator) -> bool {
        match locator {
            Locator::File { path } => is_file(path).await,
            _ => false,
        }
    }
}

// ============================================================================
// pkg:
// ============================================================================

/// 설정된 패키지 루트 내부 리소스 (`pkg:<package>/<path>`)
pub struct PackageResolver {
    roots: HashMap<String, PathBuf>,
}

impl PackageResolver {
    /// 상대 패키지 루트는 `project_root` 와 결합
    pub fn new(project_root: &Path, roots: &HashMap<String, PathBuf>) -> Self {
        Self {
            roots: roots
                .iter()
                .map(|(name, root)| {
                    let root = if root.is_absolute() {
                        root.clone()
                    } else {
                        project_root.join(root)
                    };
                    (name.clone(), root)
                })
                .collect(),
        }
    }

    fn file_path(&self, package: &str, path: &str) -> Option<PathBuf> {
        self.roots.get(package).map(|root| root.join(path))
    }
}

#[async_trait]
impl SchemeResolver for PackageResolver {
    fn scheme(&self) -> Scheme {
        Scheme::Package
    }

    async fn resolve(&self, reference: &str) -> Option<Locator> {
        let (package, path) = reference.split_once('/')?;
        let file = self.file_path(package, path)?;
        is_file(&file).await.then(|| Locator::Package {
            package: package.to_string(),
            path: path.to_string(),
        })
    }

    fn resolve_all(&self, pattern: &str) -> Vec<Locator> {
        let Some((package, pattern)) = pattern.split_once('/') else {
            return Vec::new();
        };
        let Some(root) = self.roots.get(package) else {
            debug!("Unknown package: {}", package);
            return Vec::new();
        };
        glob_relative(root, pattern)
            .into_iter()
            .map(|relative| Locator::Package {
                package: package.to_string(),
                path: relative.to_string_lossy().replace('\\', "/"),
            })
            .collect()
    }

    async fn load(&self, locator: &Locator) -> Result<Vec<u8>> {
        match locator {
            Locator::Package { package, path } => {
                let file = self
                    .file_path(package, path)
                    .ok_or_else(|| Error::Resource(format!("Unknown package: {}", package)))?;
                Ok(tokio::fs::read(file).await?)
            }
            other => Err(wrong_scheme(Scheme::Package, other)),
        }
    }

    async fn exists(&self, locator: &Locator) -> bool {
        match locator {
            Locator::Package { package, path } => match self.file_path(package, path) {
                Some(file) => is_file(&file).await,
                None => false,
            },
            _ => false,
        }
    }
}

// ============================================================================
// builtin:
// ============================================================================

/// 메모리 리소스
#[derive(Default)]
pub struct BuiltinResolver {
    resources: BTreeMap<String, Vec<u8>>,
}

impl BuiltinResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.resources.insert(name.into(), content.into());
    }
}

#[async_trait]
impl SchemeResolver for BuiltinResolver {
    fn scheme(&self) -> Scheme {
        Scheme::Builtin
    }

    async fn resolve(&self, reference: &str) -> Option<Locator> {
        self.resources
            .contains_key(reference)
            .then(|| Locator::Builtin {
                name: reference.to_string(),
            })
    }

    fn resolve_all(&self, pattern: &str) -> Vec<Locator> {
        let Ok(pattern) = glob::Pattern::new(pattern) else {
            return Vec::new();
        };
        self.resources
            .keys()
            .filter(|name| pattern.matches(name))
            .map(|name| Locator::Builtin { name: name.clone() })
            .collect()
    }

    async fn load(&self, locator: &Locator) -> Result<Vec<u8>> {
        match locator {
            Locator::Builtin { name } => self
                .resources
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Resource(format!("Unknown builtin resource: {}", name))),
            other => Err(wrong_scheme(Scheme::Builtin, other)),
        }
    }

    async fn exists(&self, locator: &Locator) -> bool {
        matches!(locator, Locator::Builtin { name } if self.resources.contains_key(name))
    }
}

// ============================================================================
// http(s)
// ============================================================================

/// 타임아웃을 두고 가져오는 원격 리소스
pub struct HttpResolver {
    client: Client,
}

impl HttpResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Trellis/0.1")
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SchemeResolver for HttpResolver {
    fn scheme(&self) -> Scheme {
        Scheme::Http
    }

    async fn resolve(&self, reference: &str) -> Option<Locator> {
        Some(Locator::Http {
            url: reference.to_string(),
        })
    }

    fn resolve_all(&self, pattern: &str) -> Vec<Locator> {
        debug!("Glob patterns are not supported for remote resources: {}", pattern);
        Vec::new()
    }

    async fn load(&self, locator: &Locator) -> Result<Vec<u8>> {
        let Locator::Http { url } = locator else {
            return Err(wrong_scheme(Scheme::Http, locator));
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Http(e.to_string()))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn exists(&self, locator: &Locator) -> bool {
        let Locator::Http { url } = locator else {
            return false;
        };
        self.client
            .head(url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}
