// 📈 Forecast record - one time-stamped estimate for a firm
// Several may exist per firm; only the most recent one matters.

use super::firm::FirmId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub firm_id: FirmId,

    /// Expected financial return in TL (unclamped, as stored)
    pub estimated_return: Option<f64>,

    /// Sustainability compliance score
    pub sustainability_score: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl ForecastRecord {
    pub fn new(firm_id: FirmId, estimated_return: f64, created_at: DateTime<Utc>) -> Self {
        ForecastRecord {
            firm_id,
            estimated_return: Some(estimated_return),
            sustainability_score: None,
            created_at,
        }
    }

    pub fn with_sustainability(mut self, score: f64) -> Self {
        self.sustainability_score = Some(score);
        self
    }
}
