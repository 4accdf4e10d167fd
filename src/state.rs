use std::sync::Arc;

use url::Url;

use crate::auth::{AccessTokenIssuer, SessionVerifier};
use crate::client::{endpoint, parse_base_url, ClientError};
use crate::config::AppConfig;

/// Shared state handed to every proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionVerifier,
    pub tokens: AccessTokenIssuer,
    pub upstream: Upstream,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let upstream = Upstream::new(reqwest::Client::new(), config.upstream.base_url.as_deref())?;
        Ok(Self {
            sessions: SessionVerifier::new(config.security.session_secret.clone()),
            tokens: AccessTokenIssuer::new(
                config.security.access_token_secret.clone(),
                config.security.access_token_ttl_secs,
            ),
            upstream,
            config: Arc::new(config),
        })
    }
}

/// The external API as seen from the proxy.
#[derive(Clone)]
pub struct Upstream {
    pub http: reqwest::Client,
    base_url: Option<Url>,
}

impl Upstream {
    pub fn new(http: reqwest::Client, base_url: Option<&str>) -> Result<Self, ClientError> {
        let base_url = base_url.map(parse_base_url).transpose()?;
        Ok(Self { http, base_url })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let base = self
            .base_url
            .as_ref()
            .ok_or_else(|| ClientError::InvalidBaseUrl("upstream base URL not configured".to_string()))?;
        endpoint(base, segments)
    }
}
