//! 로깅 초기화
//!
//! `[general]` 섹션의 `log_level`, `log_format`으로 전역 `tracing` 구독자를
//! 설치합니다. `RUST_LOG`가 설정되어 있으면 `log_level`보다 우선합니다.
//!
//! 라이브러리 크레이트는 구독자를 설치하지 않습니다. 애플리케이션이 시작 시
//! [`init_tracing`]을 한 번 호출합니다.

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::GeneralConfig;

/// 전역 `tracing` 구독자를 설치합니다.
///
/// 프로세스당 한 번만 성공합니다. 이미 구독자가 있으면 에러를 반환합니다.
///
/// - `"json"`: 한 줄 JSON (수집기 연동용)
/// - `"pretty"`: 사람이 읽기 쉬운 여러 줄 출력
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter = env_filter(&config.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init()
            .context("tracing subscriber already installed")?,
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("tracing subscriber already installed")?,
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    }

    tracing::debug!(
        level = %config.log_level,
        format = %config.log_format,
        "tracing initialized"
    );
    Ok(())
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level directive '{level}'"))
}
