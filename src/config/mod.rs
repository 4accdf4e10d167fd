use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub upstream: UpstreamConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// The external backend that owns every CashWise record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the external API, e.g. `https://api.cashwise.app`.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Secret the identity provider signs session tokens with.
    pub session_secret: String,
    /// Secret used to sign the short-lived tokens forwarded upstream.
    pub access_token_secret: String,
    pub access_token_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env::var("CASHWISE_API_BASE_URL")
            .ok()
            .or_else(|| env::var("BASE_URL_API").ok())
        {
            let v = v.trim().trim_end_matches('/').to_string();
            self.upstream.base_url = if v.is_empty() { None } else { Some(v) };
        }

        if let Some(v) = env::var("CASHWISE_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SESSION_JWT_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.access_token_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_TTL_SECS") {
            self.security.access_token_ttl_secs = v.parse().unwrap_or(self.security.access_token_ttl_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            upstream: UpstreamConfig {
                base_url: Some("http://localhost:3333".to_string()),
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                session_secret: String::new(),
                access_token_secret: String::new(),
                access_token_ttl_secs: 60,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            upstream: UpstreamConfig { base_url: None },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.cashwise.app".to_string()],
                session_secret: String::new(),
                access_token_secret: String::new(),
                access_token_ttl_secs: 60,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            upstream: UpstreamConfig { base_url: None },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://cashwise.app".to_string()],
                session_secret: String::new(),
                access_token_secret: String::new(),
                access_token_ttl_secs: 30,
            },
        }
    }
}

// Global singleton config for the binaries; library code takes `&AppConfig` explicitly.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.upstream.base_url.as_deref(), Some("http://localhost:3333"));
        assert_eq!(config.security.access_token_ttl_secs, 60);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.upstream.base_url.is_none());
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.security.cors_origins, vec!["https://cashwise.app".to_string()]);
    }
}
