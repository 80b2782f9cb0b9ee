//! Plugin System - 레지스트리 확장 훅
//!
//! ## 구조
//!
//! - `RegistryPlugin`: 초기화 / 로드 전후 / 해제 훅
//! - `HotReloadAware`: hot reload 성공 알림 (선택)
//! - `PluginHost`: 등록 순서 관리, 에러/panic 격리
//!
//! ## 사용 예시
//!
//! ```ignore
//! struct AuditPlugin;
//!
//! #[async_trait]
//! impl RegistryPlugin for AuditPlugin {
//!     fn name(&self) -> &str { "audit" }
//!
//!     async fn after_load(&self, name: &str, descriptor: Option<&TypeDescriptor>) -> Result<()> {
//!         tracing::info!("loaded {} ({})", name, descriptor.is_some());
//!         Ok(())
//!     }
//! }
//!
//! registry.register_plugin(Arc::new(AuditPlugin)).await?;
//! ```

mod host;
mod traits;

pub use host::PluginHost;
pub use traits::{HotReloadAware, PluginCapability, PluginContext, RegistryPlugin};
