use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::context::SettingsContext;
use crate::models::SettingsPatch;

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Show current settings")]
    Show,

    #[command(about = "Change one or more settings")]
    Update {
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },
}

pub async fn handle(cmd: SettingsCommands, cli: &CliContext) -> anyhow::Result<()> {
    let ctx = SettingsContext::new(cli.client.clone(), cli.notifier.clone()).with_viewer(cli.viewer.clone());

    match cmd {
        SettingsCommands::Show => {
            ctx.fetch().await;
            let Some(settings) = ctx.settings().await else {
                return Ok(());
            };

            match cli.output_format {
                OutputFormat::Json => output_json(&json!({ "settings": settings })),
                OutputFormat::Text => {
                    println!("Currency: {}", settings.currency);
                    println!("Language: {}", settings.language);
                    if let Some(theme) = &settings.theme {
                        println!("Theme: {}", theme);
                    }
                    Ok(())
                }
            }
        }
        SettingsCommands::Update { currency, language, theme } => {
            let patch = SettingsPatch { currency, language, theme };
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass --currency, --language or --theme");
            }
            if let Some(saved) = ctx.update(&patch).await {
                output_success(&cli.output_format, "Settings updated", Some(json!(saved)))?;
            }
            Ok(())
        }
    }
}
