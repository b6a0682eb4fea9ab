//! tracing 구독자 초기화.
//!
//! `logging.format`은 `pretty`(개발), `json`(운영 로그 수집), `compact` 중 하나입니다.
//! `RUST_LOG`가 있으면 `logging.level` 대신 사용합니다.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// 로깅 초기화 에러.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("알 수 없는 로그 형식: {0}")]
    UnknownFormat(String),

    #[error("잘못된 로그 필터: {0}")]
    InvalidFilter(String),

    #[error("전역 구독자 설치 실패: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Pretty,
    Json,
    Compact,
}

fn output(format: &str) -> Result<Output, LoggingError> {
    match format.trim().to_ascii_lowercase().as_str() {
        "" | "pretty" => Ok(Output::Pretty),
        "json" => Ok(Output::Json),
        "compact" => Ok(Output::Compact),
        other => Err(LoggingError::UnknownFormat(other.to_string())),
    }
}

fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| LoggingError::InvalidFilter(e.to_string()))
}

/// 설정에 따라 전역 구독자를 설치합니다. 프로세스당 한 번만 성공합니다.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let output = output(&config.format)?;
    let registry = tracing_subscriber::registry().with(level_filter(&config.level)?);

    match output {
        Output::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
        Output::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()?,
        Output::Compact => registry.with(fmt::layer().compact()).try_init()?,
    }

    tracing::info!(format = ?output, level = %config.level, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(output("json").unwrap(), Output::Json);
        assert_eq!(output(" Compact ").unwrap(), Output::Compact);
        // 비어 있으면 개발용 형식
        assert_eq!(output("").unwrap(), Output::Pretty);
        assert!(matches!(output("xml"), Err(LoggingError::UnknownFormat(f)) if f == "xml"));
    }

    #[test]
    fn test_unknown_format_rejected_before_install() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "syslog".to_string(),
        };
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::UnknownFormat(_))
        ));
    }
}
