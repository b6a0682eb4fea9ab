//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 로드 순서는 기본값 → 설정 파일(선택) → `SHOPARENA__` 접두사 환경 변수 →
//! 배포 환경에서 흔히 쓰는 단순 환경 변수(`PORT`, `DATABASE_URL`, `REDIS_URL`,
//! `JWT_SECRET`, `LOG_FORMAT`)입니다. 빈 값은 미설정으로 취급합니다.

use serde::Deserialize;
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 인증 토큰 설정
    pub auth: AuthConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// Redis 설정
    pub redis: RedisConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 처리 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            request_timeout_secs: 30,
        }
    }
}

/// 인증 토큰 설정.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키 (미설정 시 개발용 키 사용)
    pub jwt_secret: Option<String>,
    /// Access Token 만료 시간 (분)
    pub access_token_ttl_minutes: i64,
    /// 비밀번호 재설정 토큰 만료 시간 (분)
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_ttl_minutes: 120,
            reset_token_ttl_minutes: 30,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("reset_token_ttl_minutes", &self.reset_token_ttl_minutes)
            .finish()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL (미설정 시 메모리 저장소 사용)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// Redis 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis URL (설정 시 토큰 폐기 목록을 Redis에 저장)
    pub url: Option<String>,
    /// 폐기된 토큰 키 접두사
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            key_prefix: "shoparena:revoked:".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// CORS 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// preflight 응답 캐시 시간 (초)
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            max_age_secs: 12 * 60 * 60,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일은 존재하지 않아도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 접두사 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SHOPARENA")
                    .separator("__")
                    .try_parsing(true),
            )
            // 단순 환경 변수 (PaaS 호환)
            .set_override_option("server.port", non_empty_env("PORT"))?
            .set_override_option("database.url", non_empty_env("DATABASE_URL"))?
            .set_override_option("redis.url", non_empty_env("REDIS_URL"))?
            .set_override_option("auth.jwt_secret", non_empty_env("JWT_SECRET"))?
            .set_override_option("logging.format", non_empty_env("LOG_FORMAT"))?;

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 바인딩 주소 문자열 (`host:port`).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cors.max_age_secs, 43_200);
        assert!(config.auth.jwt_secret.is_none());
        assert!(config.database.url.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 9090

                [auth]
                jwt_secret = "from-file"
                access_token_ttl_minutes = 15
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9090);
        // 지정하지 않은 필드는 기본값 유지
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.access_token_ttl_minutes, 15);
        assert_eq!(config.auth.reset_token_ttl_minutes, 30);
        assert_eq!(config.redis.key_prefix, "shoparena:revoked:");
    }

    /// `PORT` 환경 변수 처리. 프로세스 환경을 바꾸므로 한 테스트에서 순서대로 확인합니다.
    #[test]
    fn test_port_env_override() {
        const MISSING_FILE: &str = "config/does-not-exist.toml";

        std::env::set_var("PORT", "9000");
        let set = AppConfig::load(MISSING_FILE);

        std::env::set_var("PORT", "");
        let empty = AppConfig::load(MISSING_FILE);

        std::env::set_var("PORT", "abc");
        let invalid = AppConfig::load(MISSING_FILE);

        std::env::remove_var("PORT");
        let unset = AppConfig::load(MISSING_FILE);

        assert_eq!(set.unwrap().server.port, 9000);
        // 빈 값은 미설정과 같음
        assert_eq!(empty.unwrap().server.port, 8081);
        assert!(invalid.is_err());
        assert_eq!(unset.unwrap().server.port, 8081);
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: Some("super-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
