//! Type Stats - 타입별 로드 통계와 상세 로드 이벤트

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 타입 이름 하나의 누적 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLoadStats {
    /// 로드 성공 횟수
    pub load_count: u64,
    /// 로드 실패 횟수
    pub error_count: u64,
    /// hot reload 횟수
    pub reload_count: u64,
    /// 로드 성공 시간 합계
    pub total_load_time_micros: u64,
    /// 에러 메시지 (오래된 순)
    pub errors: Vec<String>,
}

impl ClassLoadStats {
    /// 평균 로드 시간 (로드 전에는 0)
    pub fn average_load_time_micros(&self) -> u64 {
        if self.load_count == 0 {
            0
        } else {
            self.total_load_time_micros / self.load_count
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// 시각이 기록된 로드 이벤트 (상세 추적 중에만 보관)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLoadEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Option<Duration>,
    pub success: bool,
    pub error: Option<String>,
}

impl ClassLoadEvent {
    pub fn loaded(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
            duration: Some(duration),
            success: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp: Utc::now(),
            duration: None,
            success: false,
            error: Some(error.into()),
        }
    }
}
