use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{flexible_date, Category, ListQuery, Resource};
use crate::client::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Signed amount; expenses may be negative depending on the account.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "flexible_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Body for POST /transaction and PATCH /transaction/{id}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "flexible_date")]
    pub date: DateTime<Utc>,
    pub account: String,
    pub paid: bool,
    pub category_id: String,
}

impl From<&Transaction> for TransactionInput {
    fn from(t: &Transaction) -> Self {
        Self {
            description: t.description.clone(),
            amount: t.amount,
            kind: t.kind,
            date: t.date,
            account: t.account.clone(),
            paid: t.paid,
            category_id: t.category.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    None,
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortOrder::None),
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Filter, sort and pagination state for the transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    pub search: String,
    pub date: Option<DateTime<Utc>>,
    pub sort: SortOrder,
    /// `None` means all types.
    pub kind: Option<TransactionType>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            date: None,
            sort: SortOrder::None,
            kind: None,
            page: 1,
            per_page: 10,
        }
    }
}

impl ListQuery for TransactionFilter {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("perPage", self.per_page.to_string())];

        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", date.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        match self.sort {
            SortOrder::None => {}
            SortOrder::Asc => pairs.push(("sort", "asc".to_string())),
            SortOrder::Desc => pairs.push(("sort", "desc".to_string())),
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }

        pairs
    }

    fn sync_position(&mut self, pagination: &Pagination) {
        self.page = pagination.page;
        self.per_page = pagination.per_page;
    }
}

impl Resource for Transaction {
    type Input = TransactionInput;
    type Query = TransactionFilter;

    const PATH: &'static str = "transaction";
    const LABEL: &'static str = "transaction";
    const PLURAL: &'static str = "transactions";

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn default_filter_sends_only_pagination() {
        let pairs = TransactionFilter::default().to_pairs();
        assert_eq!(pairs, vec![("page", "1".to_string()), ("perPage", "10".to_string())]);
    }

    #[test]
    fn full_filter_serializes_in_order() {
        let filter = TransactionFilter {
            search: "rent".into(),
            date: Some(Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap()),
            sort: SortOrder::Desc,
            kind: Some(TransactionType::Expense),
            page: 3,
            per_page: 25,
        };

        assert_eq!(
            filter.to_pairs(),
            vec![
                ("page", "3".to_string()),
                ("perPage", "25".to_string()),
                ("search", "rent".to_string()),
                ("date", "2025-01-31T00:00:00.000Z".to_string()),
                ("sort", "desc".to_string()),
                ("type", "EXPENSE".to_string()),
            ]
        );
    }

    #[test]
    fn transaction_decodes_from_api_shape() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "abc123",
            "description": "Rent",
            "amount": -1200.5,
            "type": "EXPENSE",
            "date": "2025-02-01T00:00:00.000Z",
            "account": "checking",
            "paid": true,
            "category": { "id": "c1", "name": "Housing" }
        }))
        .unwrap();

        assert_eq!(tx.kind, TransactionType::Expense);
        assert_eq!(tx.amount, Decimal::new(-12005, 1));
        assert_eq!(tx.category.unwrap().name, "Housing");
    }

    #[test]
    fn input_uses_category_id() {
        let input = TransactionInput {
            description: "Salary".into(),
            amount: Decimal::new(5000, 0),
            kind: TransactionType::Income,
            date: Utc.with_ymd_and_hms(2025, 2, 5, 0, 0, 0).unwrap(),
            account: "checking".into(),
            paid: true,
            category_id: "c9".into(),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["categoryId"], "c9");
        assert_eq!(value["type"], "INCOME");
        assert_eq!(value["amount"], json!(5000.0));
    }
}
