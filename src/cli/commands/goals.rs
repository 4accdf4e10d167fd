use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::context::GoalContext;
use crate::models::{GoalInput, GoalStatus};

#[derive(Subcommand)]
pub enum GoalCommands {
    #[command(about = "List goals with progress")]
    List,

    #[command(about = "Create a savings goal")]
    Create(GoalArgs),

    #[command(about = "Update a goal, e.g. to record new savings")]
    Update {
        #[arg(help = "Goal ID")]
        id: String,
        #[command(flatten)]
        args: GoalArgs,
    },

    #[command(about = "Delete a goal")]
    Delete {
        #[arg(help = "Goal ID")]
        id: String,
    },
}

#[derive(Args)]
pub struct GoalArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub target: Decimal,
    #[arg(long, default_value = "0")]
    pub current: Decimal,
    #[arg(long, value_parser = parse_date, help = "YYYY-MM-DD")]
    pub deadline: DateTime<Utc>,
}

impl From<GoalArgs> for GoalInput {
    fn from(a: GoalArgs) -> Self {
        Self {
            name: a.name,
            target_amount: a.target,
            current_amount: a.current,
            deadline: a.deadline,
        }
    }
}

pub async fn handle(cmd: GoalCommands, cli: &CliContext) -> anyhow::Result<()> {
    let ctx = GoalContext::new(cli.client.clone(), cli.notifier.clone()).with_viewer(cli.viewer.clone());

    match cmd {
        GoalCommands::List => {
            ctx.fetch_list().await;
            let goals = ctx.items().await;
            if goals.is_empty() {
                return output_empty_collection(&cli.output_format, "goals", "No goals yet");
            }

            let now = Utc::now();
            match cli.output_format {
                OutputFormat::Json => {
                    let goals: Vec<_> = goals
                        .iter()
                        .map(|g| json!({ "goal": g, "progress": g.progress(now) }))
                        .collect();
                    output_json(&json!({ "goals": goals }))
                }
                OutputFormat::Text => {
                    for g in &goals {
                        let progress = g.progress(now);
                        let status = match progress.status {
                            GoalStatus::Achieved => "goal achieved".to_string(),
                            GoalStatus::AlmostThere => "almost there".to_string(),
                            GoalStatus::InProgress { days_left } => format!("{} days left", days_left),
                            GoalStatus::Expired => "deadline passed".to_string(),
                        };
                        println!(
                            "{}  {:<24}  {} / {}  {:>4}%  {}",
                            g.id, g.name, g.current_amount, g.target_amount, progress.percentage, status
                        );
                    }
                    Ok(())
                }
            }
        }
        GoalCommands::Create(args) => {
            if let Some(saved) = ctx.create(&args.into()).await {
                output_success(&cli.output_format, &format!("Created goal {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        GoalCommands::Update { id, args } => {
            if let Some(saved) = ctx.update(&id, &args.into()).await {
                output_success(&cli.output_format, &format!("Updated goal {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        GoalCommands::Delete { id } => {
            ctx.remove_by_id(&id).await;
            Ok(())
        }
    }
}
