//! Telemetry - tracing subscriber 초기화
//!
//! 호스트 애플리케이션(부트스트랩 레이어)이 한 번 호출합니다.
//! `RUST_LOG` 가 설정되어 있으면 그것을, 없으면 주어진 레벨을 사용합니다.

use crate::{Error, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 전역 tracing subscriber 설치
///
/// 이미 설치되어 있으면 패닉 대신 `Error::Config` 를 반환합니다.
pub fn init_tracing(default_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))
}
