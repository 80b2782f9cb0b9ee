//! Scan Scope - 디스커버리 대상 패키지/모듈 prefix 목록

use serde::{Deserialize, Serialize};

/// 스캔 범위
///
/// prefix `p` 는 `q == p` 이거나 `q` 가 `p.` 로 시작할 때 매칭됩니다.
/// prefix 가 하나도 없으면 모든 타입이 범위에 포함됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanScope {
    prefixes: Vec<String>,
}

impl ScanScope {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.into().trim_end_matches('.').to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// 제한 없는 범위
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// qualified name 이 범위에 포함되는지
    pub fn matches(&self, qualified_name: &str) -> bool {
        self.is_unrestricted()
            || self.prefixes.iter().any(|p| {
                qualified_name == p
                    || qualified_name
                        .strip_prefix(p.as_str())
                        .map(|rest| rest.starts_with('.'))
                        .unwrap_or(false)
            })
    }
}
