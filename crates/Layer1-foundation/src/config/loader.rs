//! Configuration Loader
//!
//! ## 검색 우선순위
//!
//! 1. User-level: `~/.trellis/settings.json`
//! 2. Project-level: `.trellis/settings.json`
//! 3. Local (gitignored): `.trellis/settings.local.json`
//!
//! 각 레벨의 설정이 이전 레벨을 오버라이드합니다. 병합은 JSON 객체 단위로
//! 이루어지므로 하위 레벨 파일은 바꾸고 싶은 키만 적으면 됩니다.

use super::types::TrellisConfig;
use crate::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 설정 폴더 이름
pub const CONFIG_DIR_NAME: &str = ".trellis";

/// 설정 파일명
pub const SETTINGS_FILE: &str = "settings.json";

/// 로컬 설정 파일명
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";

// ============================================================================
// ConfigLoader - 설정 로더
// ============================================================================

/// 설정 로더
pub struct ConfigLoader {
    /// 검색 경로
    search_paths: Vec<ConfigPath>,
}

/// 설정 파일 경로 정보
#[derive(Debug, Clone)]
struct ConfigPath {
    /// 경로
    path: PathBuf,
    /// 우선순위 (높을수록 우선)
    priority: u8,
    /// 설명
    description: &'static str,
}

impl ConfigLoader {
    /// 새 로더 생성 (기본 검색 경로)
    pub fn new(working_dir: &Path) -> Self {
        let mut paths = Vec::new();

        // 1. User-level (가장 낮은 우선순위)
        if let Some(home) = dirs::home_dir() {
            paths.push(ConfigPath {
                path: home.join(CONFIG_DIR_NAME).join(SETTINGS_FILE),
                priority: 10,
                description: "User settings",
            });
        }

        // 2. Project-level
        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE),
            priority: 20,
            description: "Project settings",
        });

        // 3. Local (가장 높은 우선순위)
        paths.push(ConfigPath {
            path: working_dir.join(CONFIG_DIR_NAME).join(LOCAL_SETTINGS_FILE),
            priority: 30,
            description: "Local settings",
        });

        paths.sort_by_key(|p| p.priority);

        Self {
            search_paths: paths,
        }
    }

    /// 커스텀 검색 경로로 생성 (뒤에 올수록 우선)
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        let search_paths = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConfigPath {
                path,
                priority: i as u8,
                description: "Custom",
            })
            .collect();

        Self { search_paths }
    }

    /// 모든 경로에서 설정 로드하여 병합
    pub fn load_all(&self) -> Result<TrellisConfig> {
        let mut merged = Value::Object(Default::default());

        for config_path in &self.search_paths {
            if !config_path.path.exists() {
                continue;
            }

            match read_config_value(&config_path.path) {
                Ok(value) => {
                    info!(
                        "Loaded {} from: {}",
                        config_path.description,
                        config_path.path.display()
                    );
                    merge_values(&mut merged, value);
                }
                Err(e) => {
                    warn!(
                        "Failed to load settings from {}: {}",
                        config_path.path.display(),
                        e
                    );
                }
            }
        }

        serde_json::from_value(merged)
            .map_err(|e| Error::Config(format!("Invalid merged settings: {}", e)))
    }

    /// 존재하는 설정 파일 목록
    pub fn existing_files(&self) -> Vec<PathBuf> {
        self.search_paths
            .iter()
            .filter(|p| p.path.exists())
            .map(|p| p.path.clone())
            .collect()
    }
}

// ============================================================================
// 유틸리티 함수
// ============================================================================

/// 파일에서 설정 로드 (확장자로 JSON/TOML 판별)
pub fn load_config_from_file(path: &Path) -> Result<TrellisConfig> {
    let value = read_config_value(path)?;
    serde_json::from_value(value).map_err(|e| {
        Error::Config(format!("Invalid settings at {}: {}", path.display(), e))
    })
}

/// 설정 파일을 JSON 값으로 읽기
fn read_config_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;

    let value = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let table: toml::Value = toml::from_str(&content)?;
            serde_json::to_value(table)?
        }
        _ => serde_json::from_str(&content)?,
    };

    if !value.is_object() {
        return Err(Error::Config(format!(
            "Settings at {} must be an object",
            path.display()
        )));
    }

    debug!("Read config from {}", path.display());
    Ok(value)
}

/// 두 JSON 값을 병합 (later 가 earlier 를 오버라이드, 객체는 재귀 병합)
pub fn merge_values(earlier: &mut Value, later: Value) {
    match (earlier, later) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidationPolicy;
    use serde_json::json;

    #[test]
    fn test_merge_values() {
        let mut base = json!({ "registry": { "name": "app", "developmentMode": false } });
        merge_values(&mut base, json!({ "registry": { "developmentMode": true } }));

        assert_eq!(base["registry"]["name"], "app");
        assert_eq!(base["registry"]["developmentMode"], true);
    }

    #[test]
    fn test_load_layers() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project.json");
        let local = dir.path().join("local.toml");

        std::fs::write(
            &project,
            r#"{ "registry": { "name": "shop", "scanScope": ["app.services"] } }"#,
        )
        .unwrap();
        std::fs::write(
            &local,
            "[registry]\ndevelopmentMode = true\ninvalidationPolicy = \"transitive\"\n",
        )
        .unwrap();

        let loader = ConfigLoader::with_paths(vec![
            project,
            local,
            dir.path().join("missing.json"),
        ]);
        assert_eq!(loader.existing_files().len(), 2);

        let config = loader.load_all().unwrap();
        assert_eq!(config.registry.name, "shop");
        assert_eq!(config.registry.scan_scope, vec!["app.services".to_string()]);
        assert!(config.registry.development_mode);
        assert_eq!(config.registry.invalidation_policy, InvalidationPolicy::Transitive);
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        let config = ConfigLoader::with_paths(vec![broken]).load_all().unwrap();
        assert_eq!(config, TrellisConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "resources": { "cacheTtlSecs": 600 } }"#).unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.resources.cache_ttl_secs, 600);
    }
}
