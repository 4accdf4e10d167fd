use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{flexible_date, Category, Resource};

/// Spending limit for one category over the period starting at `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    #[serde(with = "flexible_date")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    #[serde(with = "flexible_date")]
    pub date: DateTime<Utc>,
}

impl From<&Budget> for BudgetInput {
    fn from(b: &Budget) -> Self {
        Self {
            category_id: b.category.id.clone(),
            limit: b.limit,
            date: b.date,
        }
    }
}

impl Resource for Budget {
    type Input = BudgetInput;
    type Query = ();

    const PATH: &'static str = "budget";
    const LABEL: &'static str = "budget";
    const PLURAL: &'static str = "budgets";

    fn id(&self) -> &str {
        &self.id
    }
}
