use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::context::CategoryContext;
use crate::models::CategoryInput;

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List categories")]
    List,

    #[command(about = "Create a category")]
    Create {
        #[arg(help = "Category name")]
        name: String,
    },

    #[command(about = "Rename a category")]
    Rename {
        #[arg(help = "Category ID")]
        id: String,
        #[arg(help = "New name")]
        name: String,
    },

    #[command(about = "Delete a category")]
    Delete {
        #[arg(help = "Category ID")]
        id: String,
    },
}

pub async fn handle(cmd: CategoryCommands, cli: &CliContext) -> anyhow::Result<()> {
    let ctx = CategoryContext::new(cli.client.clone(), cli.notifier.clone()).with_viewer(cli.viewer.clone());

    match cmd {
        CategoryCommands::List => {
            ctx.fetch_list().await;
            let categories = ctx.items().await;
            if categories.is_empty() {
                return output_empty_collection(&cli.output_format, "categories", "No categories yet");
            }

            match cli.output_format {
                OutputFormat::Json => output_json(&json!({ "categories": categories })),
                OutputFormat::Text => {
                    for c in &categories {
                        println!("{}  {}", c.id, c.name);
                    }
                    Ok(())
                }
            }
        }
        CategoryCommands::Create { name } => {
            if let Some(saved) = ctx.create(&CategoryInput { name }).await {
                output_success(&cli.output_format, &format!("Created category {}", saved.name), Some(json!(saved)))?;
            }
            Ok(())
        }
        CategoryCommands::Rename { id, name } => {
            if let Some(saved) = ctx.update(&id, &CategoryInput { name }).await {
                output_success(&cli.output_format, &format!("Renamed category {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        CategoryCommands::Delete { id } => {
            ctx.remove_by_id(&id).await;
            Ok(())
        }
    }
}
