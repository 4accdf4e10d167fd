use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::context::BudgetContext;
use crate::models::BudgetInput;

#[derive(Subcommand)]
pub enum BudgetCommands {
    #[command(about = "List budgets")]
    List,

    #[command(about = "Create a budget for a category")]
    Create(BudgetArgs),

    #[command(about = "Change a budget's category, limit or period")]
    Update {
        #[arg(help = "Budget ID")]
        id: String,
        #[command(flatten)]
        args: BudgetArgs,
    },

    #[command(about = "Delete a budget")]
    Delete {
        #[arg(help = "Budget ID")]
        id: String,
    },
}

#[derive(Args)]
pub struct BudgetArgs {
    #[arg(long = "category", help = "Category ID")]
    pub category_id: String,
    #[arg(long)]
    pub limit: Decimal,
    #[arg(long, value_parser = parse_date, help = "First day of the budget period (YYYY-MM-DD)")]
    pub date: DateTime<Utc>,
}

impl From<BudgetArgs> for BudgetInput {
    fn from(a: BudgetArgs) -> Self {
        Self {
            category_id: a.category_id,
            limit: a.limit,
            date: a.date,
        }
    }
}

pub async fn handle(cmd: BudgetCommands, cli: &CliContext) -> anyhow::Result<()> {
    let ctx = BudgetContext::new(cli.client.clone(), cli.notifier.clone()).with_viewer(cli.viewer.clone());

    match cmd {
        BudgetCommands::List => {
            ctx.fetch_list().await;
            let budgets = ctx.items().await;
            if budgets.is_empty() {
                return output_empty_collection(&cli.output_format, "budgets", "No budgets configured");
            }

            match cli.output_format {
                OutputFormat::Json => output_json(&json!({ "budgets": budgets })),
                OutputFormat::Text => {
                    for b in &budgets {
                        println!("{}  {}  {:<20}  {:>12}", b.id, b.date.format("%Y-%m"), b.category.name, b.limit);
                    }
                    Ok(())
                }
            }
        }
        BudgetCommands::Create(args) => {
            if let Some(saved) = ctx.create(&args.into()).await {
                output_success(&cli.output_format, &format!("Created budget {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        BudgetCommands::Update { id, args } => {
            if let Some(saved) = ctx.update(&id, &args.into()).await {
                output_success(&cli.output_format, &format!("Updated budget {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        BudgetCommands::Delete { id } => {
            ctx.remove_by_id(&id).await;
            Ok(())
        }
    }
}
