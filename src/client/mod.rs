//! Bearer-authenticated JSON client for the external CashWise API.

mod pagination;

pub use pagination::Pagination;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("token unavailable: {0}")]
    Token(#[from] AuthError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status} {reason}")]
    Status {
        status: StatusCode,
        reason: String,
        body: Option<Value>,
    },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Supplies the bearer token attached to every outbound request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<String, AuthError>;
}

/// A fixed token, e.g. read from `CASHWISE_TOKEN`.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, AuthError> {
        if self.0.is_empty() {
            return Err(AuthError::MissingSession);
        }
        Ok(self.0.clone())
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>) -> Result<Self, ClientError> {
        Self::with_http(reqwest::Client::new(), base_url, tokens)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
            tokens,
        })
    }

    /// GET a list endpoint; pagination comes from the `x-*` response headers.
    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<ListPage<T>, ClientError> {
        let url = endpoint(&self.base_url, &[path])?;
        let req = self.http.get(url).query(query);
        let res = self.send(req).await?;

        let pagination = Pagination::from_headers(res.headers());
        let bytes = res.bytes().await?;
        let items = serde_json::from_slice(&bytes)?;

        Ok(ListPage { items, pagination })
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        self.json(Method::GET, segments, None::<&()>).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        self.json(Method::POST, segments, Some(body)).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        self.json(Method::PATCH, segments, Some(body)).await
    }

    /// DELETE; the response body is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), ClientError> {
        let url = endpoint(&self.base_url, segments)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let url = endpoint(&self.base_url, segments)?;
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = self.send(req).await?;
        let bytes = res.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let token = self.tokens.token().await?;
        let res = req.bearer_auth(token).send().await?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let body = res
            .bytes()
            .await
            .ok()
            .and_then(|b| serde_json::from_slice::<Value>(&b).ok());
        tracing::warn!("upstream responded {} {}", status, reason);

        Err(ClientError::Status { status, reason, body })
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let url = Url::parse(raw.trim()).map_err(|e| ClientError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_to_base_path() {
        let base = parse_base_url("http://api.local:8080").unwrap();
        assert_eq!(
            endpoint(&base, &["transaction", "abc123"]).unwrap().as_str(),
            "http://api.local:8080/transaction/abc123"
        );

        let base = parse_base_url("https://api.local/v1/").unwrap();
        assert_eq!(endpoint(&base, &["budget"]).unwrap().as_str(), "https://api.local/v1/budget");
    }

    #[test]
    fn endpoint_escapes_ids() {
        let base = parse_base_url("http://api.local").unwrap();
        assert_eq!(
            endpoint(&base, &["transaction", "a/b c"]).unwrap().as_str(),
            "http://api.local/transaction/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(parse_base_url("mailto:someone@example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
