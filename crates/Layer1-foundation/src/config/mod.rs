//! Config - 통합 설정 관리
//!
//! - `types.rs` - TrellisConfig (registry / resources / metrics)
//! - `loader.rs` - 계층별 설정 파일 로드 및 병합 (JSON, TOML)

mod loader;
mod types;

pub use loader::{
    load_config_from_file, merge_values, ConfigLoader, CONFIG_DIR_NAME, LOCAL_SETTINGS_FILE,
    SETTINGS_FILE,
};
pub use types::{InvalidationPolicy, MetricsConfig, RegistryConfig, ResourceConfig, TrellisConfig};
