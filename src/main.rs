use cashwise::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up CASHWISE_API_BASE_URL and the secrets
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = cashwise::config::config().clone();
    tracing::info!("Starting CashWise proxy in {:?} mode", config.environment);

    match config.upstream.base_url.as_deref() {
        Some(url) => tracing::info!("Forwarding to {}", url),
        None => tracing::warn!("CASHWISE_API_BASE_URL is not set; proxy requests will fail"),
    }
    if config.security.session_secret.is_empty() {
        tracing::warn!("SESSION_JWT_SECRET is not set; every proxied request will be rejected");
    }
    if cashwise::is_development!() && config.security.access_token_secret.is_empty() {
        tracing::warn!("ACCESS_TOKEN_SECRET is not set; upstream tokens cannot be minted");
    }

    let port = config.api.port;
    let app = cashwise::server::app(AppState::new(config)?);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("CashWise proxy listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
