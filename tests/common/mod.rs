#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use cashwise::auth::{sign_session, SessionClaims};
use cashwise::config::AppConfig;
use cashwise::state::AppState;
use serde_json::Value;

pub const SESSION_SECRET: &str = "test-session-secret";
pub const ACCESS_SECRET: &str = "test-access-secret";

/// A request as seen by the stub upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn bearer(&self) -> Option<String> {
        self.headers
            .get("authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")
            .map(str::to_string)
    }
}

/// Canned reply for the stub upstream.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
    body: String,
    delay: Duration,
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            headers: vec![("content-type", "application/json".to_string())],
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            headers: vec![("content-type", "text/plain".to_string())],
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

#[derive(Clone)]
struct Stub {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

/// In-process stand-in for the external CashWise API.
pub struct Upstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Upstream {
    pub async fn spawn(responder: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) -> Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stub = Stub {
            requests: requests.clone(),
            responder: Arc::new(responder),
        };

        let router = Router::new().fallback(record).with_state(stub);
        let base_url = serve(router).await?;
        Ok(Self { base_url, requests })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn record(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    let reply = (stub.responder)(&request);
    stub.requests.lock().unwrap().push(request);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut headers = HeaderMap::new();
    for (name, value) in reply.headers {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_str(&value).unwrap());
    }
    (reply.status, headers, reply.body).into_response()
}

/// Bind `router` on a free local port and serve it in the background.
async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

pub fn test_config(upstream: Option<&str>) -> AppConfig {
    let mut config = AppConfig::development();
    config.upstream.base_url = upstream.map(str::to_string);
    config.api.enable_request_logging = false;
    config.security.enable_cors = false;
    config.security.session_secret = SESSION_SECRET.to_string();
    config.security.access_token_secret = ACCESS_SECRET.to_string();
    config
}

/// Start the proxy against `upstream` and return its base URL.
pub async fn spawn_proxy(upstream: Option<&str>) -> Result<String> {
    let state = AppState::new(test_config(upstream))?;
    serve(cashwise::server::app(state)).await
}

/// A session token for `user_id` signed the way the identity provider would.
pub fn session_token(user_id: &str) -> String {
    let claims = SessionClaims::new(user_id, true, chrono::Duration::minutes(10));
    sign_session(SESSION_SECRET, &claims).expect("failed to sign session")
}

/// A free port nothing is listening on.
pub fn dead_url() -> String {
    let port = portpicker::pick_unused_port().expect("failed to pick free port");
    format!("http://127.0.0.1:{}", port)
}
