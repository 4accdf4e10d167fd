use std::env;

use anyhow::Context;

/// Connection settings for the CLI, read from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: String,
    pub token: String,
    pub user: String,
}

impl CliConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var("CASHWISE_API_BASE_URL")
            .or_else(|_| env::var("BASE_URL_API"))
            .context("CASHWISE_API_BASE_URL is not set")?;
        let token = env::var("CASHWISE_TOKEN").context("CASHWISE_TOKEN is not set")?;
        let user = env::var("CASHWISE_USER").unwrap_or_else(|_| "cli".to_string());

        Ok(Self { base_url, token, user })
    }
}
