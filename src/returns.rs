// 💵 Returns Aggregator
// Joins every firm with its latest forecast and derives the budget figures.

use crate::entities::{Firm, FirmId, ForecastRecord};
use crate::money::{clamp_money, clamp_money_opt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmReturn {
    pub id: FirmId,
    pub name: String,
    pub estimated_return: f64,
    pub women_budget: f64,
}

impl FirmReturn {
    /// The budget can only exceed the return through clamping or a share > 1
    pub fn is_consistent(&self) -> bool {
        budget_consistent(self.estimated_return, self.women_budget)
    }
}

/// Shared consistency rule for aggregate rows and single-firm KPIs
pub fn budget_consistent(estimated_return: f64, women_budget: f64) -> bool {
    !(women_budget > estimated_return || women_budget.is_nan() || estimated_return.is_nan())
}

/// Both derived figures for one estimated return
pub fn derive_budget(estimated_return: Option<f64>, budget_share: f64) -> (f64, f64) {
    let estimated_return = clamp_money_opt(estimated_return);
    let women_budget = clamp_money(estimated_return * budget_share);
    (estimated_return, women_budget)
}

/// One row per firm, in the order of `firms`
pub fn aggregate_returns(
    firms: &[Firm],
    latest: &HashMap<FirmId, ForecastRecord>,
    budget_share: f64,
) -> Vec<FirmReturn> {
    firms
        .iter()
        .map(|firm| {
            let estimated = latest.get(&firm.id).and_then(|r| r.estimated_return);
            let (estimated_return, women_budget) = derive_budget(estimated, budget_share);

            FirmReturn {
                id: firm.id,
                name: firm.name.clone(),
                estimated_return,
                women_budget,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
