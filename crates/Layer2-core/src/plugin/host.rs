//! Plugin Host - 플러그인 라이프사이클과 훅 호출
//!
//! 훅은 등록 순서대로 호출되며, 훅 안의 에러와 panic 은 잡아서 로그만
//! 남깁니다. 락을 잡은 채로 훅을 호출하지 않습니다.

use super::traits::{HotReloadAware, PluginCapability, PluginContext, RegistryPlugin};
use crate::reflect::TypeDescriptor;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use trellis_foundation::{Error, Result};

/// 등록된 플러그인 정보
#[derive(Clone)]
struct PluginEntry {
    /// 플러그인 인스턴스
    plugin: Arc<dyn RegistryPlugin>,

    /// 등록 시 해석된 hot reload 훅
    hot_reload: Option<Arc<dyn HotReloadAware>>,

    /// 등록 시 선언된 기능
    capabilities: Vec<PluginCapability>,
}

impl PluginEntry {
    fn name(&self) -> &str {
        self.plugin.name()
    }
}

/// 플러그인 호스트
#[derive(Default)]
pub struct PluginHost {
    /// 등록 순서대로 저장
    plugins: RwLock<Vec<PluginEntry>>,
}

impl PluginHost {
    /// 새 호스트 생성
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // 등록 / 해제
    // ========================================================================

    /// 플러그인 등록
    ///
    /// 이름이 중복되거나 `initialize` 가 실패(또는 panic)하면 거부됩니다.
    pub async fn register(&self, plugin: Arc<dyn RegistryPlugin>, ctx: &PluginContext) -> Result<()> {
        let name = plugin.name().to_string();

        if self.contains(&name).await {
            warn!("Plugin {} is already registered", name);
            return Err(Error::Plugin(format!("Plugin '{}' is already registered", name)));
        }

        match AssertUnwindSafe(plugin.initialize(ctx)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Plugin {} failed to initialize: {}", name, e);
                return Err(Error::Plugin(format!(
                    "Plugin '{}' failed to initialize: {}",
                    name, e
                )));
            }
            Err(_) => {
                warn!("Plugin {} panicked during initialize", name);
                return Err(Error::Plugin(format!(
                    "Plugin '{}' panicked during initialize",
                    name
                )));
            }
        }

        let capabilities = plugin.capabilities();
        let hot_reload = Arc::clone(&plugin).hot_reload_hook();

        let mut plugins = self.plugins.write().await;
        if plugins.iter().any(|p| p.name() == name) {
            return Err(Error::Plugin(format!("Plugin '{}' is already registered", name)));
        }
        plugins.push(PluginEntry {
            plugin,
            hot_reload,
            capabilities,
        });

        info!("Registered plugin: {} (#{})", name, plugins.len());
        Ok(())
    }

    /// 플러그인 등록 해제 (`dispose` 호출)
    pub async fn unregister(&self, name: &str) -> Result<()> {
        let entry = {
            let mut plugins = self.plugins.write().await;
            let index = plugins
                .iter()
                .position(|p| p.name() == name)
                .ok_or_else(|| Error::Plugin(format!("Plugin '{}' is not registered", name)))?;
            plugins.remove(index)
        };

        run_isolated(name, "dispose", entry.plugin.dispose()).await;
        info!("Unregistered plugin: {}", name);
        Ok(())
    }

    /// 모든 플러그인 해제 (등록 역순)
    pub async fn dispose_all(&self) {
        let entries = std::mem::take(&mut *self.plugins.write().await);
        for entry in entries.iter().rev() {
            run_isolated(entry.name(), "dispose", entry.plugin.dispose()).await;
        }
        if !entries.is_empty() {
            info!("Disposed {} plugins", entries.len());
        }
    }

    // ========================================================================
    // 훅 호출
    // ========================================================================

    /// 디스커버리 시도 전
    pub async fn before_load(&self, name: &str) {
        for entry in self.snapshot().await {
            run_isolated(entry.name(), "before_load", entry.plugin.before_load(name)).await;
        }
    }

    /// 디스커버리 시도 후
    pub async fn after_load(&self, name: &str, descriptor: Option<&TypeDescriptor>) {
        for entry in self.snapshot().await {
            run_isolated(
                entry.name(),
                "after_load",
                entry.plugin.after_load(name, descriptor),
            )
            .await;
        }
    }

    /// hot reload 성공 알림 (hot reload 훅을 가진 플러그인만)
    pub async fn on_reloaded(&self, name: &str, descriptor: &TypeDescriptor) {
        for entry in self.snapshot().await {
            if let Some(hook) = &entry.hot_reload {
                run_isolated(entry.name(), "on_reloaded", hook.on_reloaded(name, descriptor)).await;
            }
        }
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 등록 순서대로 플러그인 이름
    pub async fn plugin_names(&self) -> Vec<String> {
        let plugins = self.plugins.read().await;
        plugins.iter().map(|p| p.name().to_string()).collect()
    }

    pub async fn contains(&self, name: &str) -> bool {
        let plugins = self.plugins.read().await;
        plugins.iter().any(|p| p.name() == name)
    }

    /// 특정 기능을 선언한 플러그인 이름
    pub async fn with_capability(&self, capability: PluginCapability) -> Vec<String> {
        let plugins = self.plugins.read().await;
        plugins
            .iter()
            .filter(|p| p.capabilities.contains(&capability))
            .map(|p| p.name().to_string())
            .collect()
    }

    /// hot reload 훅을 가진 플러그인 수
    pub async fn hot_reload_aware_count(&self) -> usize {
        let plugins = self.plugins.read().await;
        plugins.iter().filter(|p| p.hot_reload.is_some()).count()
    }

    pub async fn len(&self) -> usize {
        self.plugins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.plugins.read().await.is_empty()
    }

    async fn snapshot(&self) -> Vec<PluginEntry> {
        self.plugins.read().await.clone()
    }
}

/// 훅 실행 (에러/panic 격리)
async fn run_isolated<F>(plugin: &str, hook: &str, fut: F)
where
    F: Future<Output = Result<()>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!("Plugin {} failed in {}: {}", plugin, hook, e);
        }
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("Plugin {} panicked in {}: {}", plugin, hook, message);
        }
    }
}
