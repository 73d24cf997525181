// ⚙️ Settings - singleton configuration row of the dashboard

use serde::{Deserialize, Serialize};

pub const DEFAULT_BUDGET_SHARE: f64 = 0.72;
pub const DEFAULT_CARBON_THRESHOLD: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Fraction of estimated return allocated to the women-entrepreneur budget
    pub budget_share: f64,

    pub carbon_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            budget_share: DEFAULT_BUDGET_SHARE,
            carbon_threshold: DEFAULT_CARBON_THRESHOLD,
        }
    }
}

impl Settings {
    /// Build from a stored row; unusable values fall back to the defaults
    pub fn from_stored(budget_share: Option<f64>, carbon_threshold: Option<f64>) -> Self {
        let budget_share = budget_share
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(DEFAULT_BUDGET_SHARE);
        let carbon_threshold = carbon_threshold
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_CARBON_THRESHOLD);

        Settings {
            budget_share,
            carbon_threshold,
        }
    }
}
