use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{CliContext, OutputFormat};
use crate::context::TransactionContext;
use crate::models::{SortOrder, TransactionFilter, TransactionInput, TransactionType};

#[derive(Subcommand)]
pub enum TransactionCommands {
    #[command(about = "List transactions with optional filters")]
    List {
        #[arg(long, help = "Free-text search on description")]
        search: Option<String>,
        #[arg(long, value_parser = parse_date, help = "Only transactions on this date (YYYY-MM-DD)")]
        date: Option<DateTime<Utc>>,
        #[arg(long, default_value = "none", help = "Sort by amount: asc, desc or none")]
        sort: SortOrder,
        #[arg(long = "type", help = "INCOME or EXPENSE")]
        kind: Option<TransactionType>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },

    #[command(about = "Create a transaction")]
    Create(TransactionArgs),

    #[command(about = "Replace a transaction's fields")]
    Update {
        #[arg(help = "Transaction ID")]
        id: String,
        #[command(flatten)]
        args: TransactionArgs,
    },

    #[command(about = "Delete a transaction")]
    Delete {
        #[arg(help = "Transaction ID")]
        id: String,
    },
}

#[derive(Args)]
pub struct TransactionArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Decimal,
    #[arg(long = "type", help = "INCOME or EXPENSE")]
    pub kind: TransactionType,
    #[arg(long, value_parser = parse_date, help = "YYYY-MM-DD")]
    pub date: DateTime<Utc>,
    #[arg(long, default_value = "")]
    pub account: String,
    #[arg(long)]
    pub paid: bool,
    #[arg(long = "category", help = "Category ID")]
    pub category_id: String,
}

impl From<TransactionArgs> for TransactionInput {
    fn from(a: TransactionArgs) -> Self {
        Self {
            description: a.description,
            amount: a.amount,
            kind: a.kind,
            date: a.date,
            account: a.account,
            paid: a.paid,
            category_id: a.category_id,
        }
    }
}

pub async fn handle(cmd: TransactionCommands, cli: &CliContext) -> anyhow::Result<()> {
    let ctx = TransactionContext::new(cli.client.clone(), cli.notifier.clone()).with_viewer(cli.viewer.clone());

    match cmd {
        TransactionCommands::List { search, date, sort, kind, page, per_page } => {
            ctx.set_query(TransactionFilter {
                search: search.unwrap_or_default(),
                date,
                sort,
                kind,
                page,
                per_page,
            })
            .await;
            ctx.fetch_list().await;

            let snapshot = ctx.snapshot().await;
            if snapshot.items.is_empty() {
                return output_empty_collection(&cli.output_format, "transactions", "No transactions found");
            }

            match cli.output_format {
                OutputFormat::Json => output_json(&json!({
                    "transactions": snapshot.items,
                    "pagination": snapshot.pagination,
                })),
                OutputFormat::Text => {
                    for t in &snapshot.items {
                        println!(
                            "{}  {}  {:>12}  {:<7}  {}{}",
                            t.id,
                            t.date.format("%Y-%m-%d"),
                            t.amount,
                            t.kind.as_str(),
                            t.description,
                            if t.paid { "" } else { "  (unpaid)" }
                        );
                    }
                    let p = snapshot.pagination;
                    println!(
                        "Page {}/{} ({} transactions, {} per page)",
                        p.page, p.total_pages, p.total_items, p.per_page
                    );
                    Ok(())
                }
            }
        }
        TransactionCommands::Create(args) => {
            if let Some(saved) = ctx.create(&args.into()).await {
                output_success(&cli.output_format, &format!("Created transaction {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        TransactionCommands::Update { id, args } => {
            if let Some(saved) = ctx.update(&id, &args.into()).await {
                output_success(&cli.output_format, &format!("Updated transaction {}", saved.id), Some(json!(saved)))?;
            }
            Ok(())
        }
        TransactionCommands::Delete { id } => {
            ctx.remove_by_id(&id).await;
            Ok(())
        }
    }
}
