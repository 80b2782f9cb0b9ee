//! Resource Resolver - 리소스 이름을 위치로 해석하고 내용을 캐시
//!
//! 내용은 위치별로 고정 TTL 동안 캐시됩니다. 만료는 조회 시점에 판단하며
//! 유효한 캐시 hit 은 원본을 읽지 않으므로, 디스크에서 바뀐 파일은 만료나
//! `clear_cache()` 이후에 반영됩니다.

use super::locator::{split_scheme, Locator, Scheme};
use super::scheme::{BuiltinResolver, FileResolver, HttpResolver, PackageResolver, SchemeResolver};
use parking_lot::Mutex;
use tracing::{debug, warn};
use trellis_foundation::{CacheStats, ResourceConfig, Result, TtlCache};

/// 모든 스킴의 리소스 해석 및 로드
pub struct ResourceResolver {
    search_dirs: Vec<String>,
    files: FileResolver,
    packages: PackageResolver,
    builtins: BuiltinResolver,
    http: HttpResolver,
    cache: Mutex<TtlCache<Locator, Vec<u8>>>,
}

impl ResourceResolver {
    /// 설정으로부터 리졸버 생성
    pub fn new(config: &ResourceConfig) -> Result<Self> {
        Ok(Self {
            search_dirs: config.search_dirs.clone(),
            files: FileResolver::new(config.project_root.clone()),
            packages: PackageResolver::new(&config.project_root, &config.package_roots),
            builtins: BuiltinResolver::new(),
            http: HttpResolver::new(config.http_timeout())?,
            cache: Mutex::new(TtlCache::new(config.cache_ttl())),
        })
    }

    /// 메모리 `builtin:` 리소스 등록
    pub fn with_builtin(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.builtins.insert(name, content);
        self
    }

    fn handler(&self, scheme: Scheme) -> &dyn SchemeResolver {
        match scheme {
            Scheme::File => &self.files,
            Scheme::Package => &self.packages,
            Scheme::Builtin => &self.builtins,
            Scheme::Http => &self.http,
        }
    }

    /// bare name 의 검색 디렉토리 후보 (순서대로)
    fn bare_candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        self.search_dirs.iter().map(move |dir| {
            let dir = dir.trim_end_matches('/');
            if dir.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", dir, name)
            }
        })
    }

    // ========================================================================
    // 해석
    // ========================================================================

    /// 참조를 위치로 해석
    ///
    /// bare name 은 검색 디렉토리를 순서대로 시도하고 첫 일치를 사용합니다.
    pub async fn resolve(&self, reference: &str) -> Option<Locator> {
        match split_scheme(reference) {
            (Some(scheme), rest) => self.handler(scheme).resolve(rest).await,
            (None, name) => {
                for candidate in self.bare_candidates(name) {
                    if let Some(locator) = self.files.resolve(&candidate).await {
                        return Some(locator);
                    }
                }
                debug!("Resource not found: {}", name);
                None
            }
        }
    }

    /// glob 패턴과 일치하는 모든 위치
    pub fn resolve_all(&self, pattern: &str) -> Vec<Locator> {
        match split_scheme(pattern) {
            (Some(scheme), rest) => self.handler(scheme).resolve_all(rest),
            (None, pattern) => {
                let mut found: Vec<Locator> = Vec::new();
                for candidate in self.bare_candidates(pattern) {
                    for locator in self.files.resolve_all(&candidate) {
                        if !found.contains(&locator) {
                            found.push(locator);
                        }
                    }
                }
                found
            }
        }
    }

    // ========================================================================
    // 로드
    // ========================================================================

    /// 바이트 로드 (캐시), 실패는 로그 후 `None`
    pub async fn load_as_bytes(&self, locator: &Locator) -> Option<Vec<u8>> {
        let cached = self.cache.lock().get(locator);
        if let Some(content) = cached {
            debug!("Resource cache hit: {}", locator);
            return Some(content);
        }

        match self.handler(locator.scheme()).load(locator).await {
            Ok(content) => {
                debug!("Loaded {} ({} bytes)", locator, content.len());
                self.cache.lock().insert(locator.clone(), content.clone());
                Some(content)
            }
            Err(e) => {
                warn!("Failed to load {}: {}", locator, e);
                None
            }
        }
    }

    /// UTF-8 텍스트 로드 (캐시)
    pub async fn load_as_text(&self, locator: &Locator) -> Option<String> {
        let bytes = self.load_as_bytes(locator).await?;
        match String::from_utf8(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("{} is not valid UTF-8: {}", locator, e);
                None
            }
        }
    }

    /// 리소스 존재 여부 (유효한 캐시 항목 포함)
    pub async fn exists(&self, locator: &Locator) -> bool {
        let cached = self.cache.lock().contains_fresh(locator);
        cached || self.handler(locator.scheme()).exists(locator).await
    }

    // ========================================================================
    // 캐시
    // ========================================================================

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        debug!("Resource cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// 저장된 항목 수 (아직 만료 확인되지 않은 항목 포함)
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}
