pub mod commands;
pub mod config;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, StaticToken};
use crate::context::Viewer;
use crate::notify::RecordingNotifier;

#[derive(Parser)]
#[command(name = "cw")]
#[command(about = "CashWise CLI - manage transactions, budgets, categories and goals")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List, create, update and delete transactions")]
    Transactions {
        #[command(subcommand)]
        cmd: commands::transactions::TransactionCommands,
    },

    #[command(about = "Manage monthly budgets per category")]
    Budgets {
        #[command(subcommand)]
        cmd: commands::budgets::BudgetCommands,
    },

    #[command(about = "Manage transaction categories")]
    Categories {
        #[command(subcommand)]
        cmd: commands::categories::CategoryCommands,
    },

    #[command(about = "Show savings goals and their progress")]
    Goals {
        #[command(subcommand)]
        cmd: commands::goals::GoalCommands,
    },

    #[command(about = "Show or change user settings")]
    Settings {
        #[command(subcommand)]
        cmd: commands::settings::SettingsCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs to build its context.
pub struct CliContext {
    pub client: ApiClient,
    pub notifier: Arc<RecordingNotifier>,
    pub viewer: Viewer,
    pub output_format: OutputFormat,
}

impl CliContext {
    pub fn from_config(cfg: config::CliConfig, output_format: OutputFormat) -> anyhow::Result<Self> {
        let client = ApiClient::new(&cfg.base_url, Arc::new(StaticToken::new(cfg.token)))?;
        Ok(Self {
            client,
            notifier: Arc::new(RecordingNotifier::new()),
            viewer: Viewer::verified(cfg.user),
            output_format,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = CliContext::from_config(config::CliConfig::from_env()?, output_format)?;

    let result = match cli.command {
        Commands::Transactions { cmd } => commands::transactions::handle(cmd, &ctx).await,
        Commands::Budgets { cmd } => commands::budgets::handle(cmd, &ctx).await,
        Commands::Categories { cmd } => commands::categories::handle(cmd, &ctx).await,
        Commands::Goals { cmd } => commands::goals::handle(cmd, &ctx).await,
        Commands::Settings { cmd } => commands::settings::handle(cmd, &ctx).await,
    };

    utils::output_notifications(&ctx.output_format, &ctx.notifier.drain())?;
    result
}
