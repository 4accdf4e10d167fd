use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{flexible_date, Resource};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_amount: Decimal,
    #[serde(with = "flexible_date")]
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub target_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_amount: Decimal,
    #[serde(with = "flexible_date")]
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GoalStatus {
    Achieved,
    /// 80% or more saved but not yet complete.
    AlmostThere,
    InProgress { days_left: i64 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub percentage: i64,
    #[serde(flatten)]
    pub status: GoalStatus,
}

impl Goal {
    /// Percentage saved (rounded half away from zero) and the resulting status at `now`.
    pub fn progress(&self, now: DateTime<Utc>) -> GoalProgress {
        let percentage = if self.target_amount <= Decimal::ZERO {
            0
        } else {
            // Ratios outside Decimal's range saturate instead of overflowing.
            let saturated = if self.current_amount.is_sign_negative() { i64::MIN } else { i64::MAX };
            self.current_amount
                .checked_div(self.target_amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .and_then(|pct| {
                    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                        .to_i64()
                })
                .unwrap_or(saturated)
        };

        let status = if percentage >= 100 {
            GoalStatus::Achieved
        } else if percentage >= 80 {
            GoalStatus::AlmostThere
        } else {
            let millis = (self.deadline - now).num_milliseconds();
            // ceil(millis / day)
            let days_left = -((-millis).div_euclid(MILLIS_PER_DAY));
            if days_left > 0 {
                GoalStatus::InProgress { days_left }
            } else {
                GoalStatus::Expired
            }
        };

        GoalProgress { percentage, status }
    }
}

impl From<&Goal> for GoalInput {
    fn from(g: &Goal) -> Self {
        Self {
            name: g.name.clone(),
            target_amount: g.target_amount,
            current_amount: g.current_amount,
            deadline: g.deadline,
        }
    }
}

impl Resource for Goal {
    type Input = GoalInput;
    type Query = ();

    const PATH: &'static str = "goal";
    const LABEL: &'static str = "goal";
    const PLURAL: &'static str = "goals";

    fn id(&self) -> &str {
        &self.id
    }
}
