//! Records mirrored from the external CashWise API.
//!
//! Nothing here is owned or validated locally beyond its shape; the external
//! API is the source of truth for every field.

pub mod budget;
pub mod category;
pub mod goal;
pub mod settings;
pub mod transaction;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

use crate::client::Pagination;

pub use budget::{Budget, BudgetInput};
pub use category::{Category, CategoryInput};
pub use goal::{Goal, GoalInput, GoalProgress, GoalStatus};
pub use settings::{Settings, SettingsPatch};
pub use transaction::{SortOrder, Transaction, TransactionFilter, TransactionInput, TransactionType};

/// A list-bearing resource exposed by the external API under `/{PATH}`.
pub trait Resource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Body sent on create (POST) and update (PATCH).
    type Input: Serialize + Send + Sync;
    /// Parameters serialized into the list query string.
    type Query: ListQuery;

    const PATH: &'static str;
    /// Human label used in notifications and proxy error messages.
    const LABEL: &'static str;
    const PLURAL: &'static str;

    fn id(&self) -> &str;
}

/// Query parameters for a list fetch. Two equal queries address the same cached view.
pub trait ListQuery: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    fn to_pairs(&self) -> Vec<(&'static str, String)>;

    /// Adopt the page position the server reported for this query.
    fn sync_position(&mut self, _pagination: &Pagination) {}
}

impl ListQuery for () {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// `"transaction"` -> `"Transaction"`, for user-facing messages.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dates from the API arrive either as RFC 3339 timestamps or as bare `YYYY-MM-DD`.
pub(crate) mod flexible_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    #[cfg(test)]
    mod tests {
        use super::parse;
        use chrono::{Datelike, Timelike};

        #[test]
        fn parses_timestamps_and_bare_dates() {
            let ts = parse("2025-03-10T14:30:00.000Z").unwrap();
            assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2025, 3, 10, 14));

            let day = parse("2025-03-10").unwrap();
            assert_eq!((day.day(), day.hour()), (10, 0));

            assert!(parse("next tuesday").is_none());
        }
    }
}
