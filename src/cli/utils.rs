use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::models::flexible_date;
use crate::notify::{Level, Notification};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the notifications a context raised. Errors turn into a failing exit status.
pub fn output_notifications(
    output_format: &OutputFormat,
    notifications: &[Notification],
) -> anyhow::Result<()> {
    for n in notifications {
        match (output_format, n.level) {
            (OutputFormat::Json, _) => eprintln!("{}", serde_json::to_string(n)?),
            (OutputFormat::Text, Level::Success) => eprintln!("✓ {}", n.message),
            (OutputFormat::Text, Level::Error) => eprintln!("✗ {}", n.message),
        }
    }

    match notifications.iter().find(|n| n.level == Level::Error) {
        Some(n) => Err(anyhow::anyhow!("{}", n.message)),
        None => Ok(()),
    }
}

/// clap value parser for `YYYY-MM-DD` or RFC 3339 dates.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    flexible_date::parse(raw).ok_or_else(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}
