// 🏭 Firm entity and the per-chart firm row shapes

use serde::{Deserialize, Serialize};

pub type FirmId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firm {
    pub id: FirmId,
    pub name: String,
}

impl Firm {
    pub fn new(id: FirmId, name: &str) -> Self {
        Firm {
            id,
            name: name.to_string(),
        }
    }
}

/// Firm row carrying waste and recycling figures (recycling chart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmRecycling {
    pub id: FirmId,
    pub name: String,
    pub waste_amount: Option<f64>,
    /// Missing rates are read as 0 and therefore never ranked
    pub recycling_rate: f64,
}

/// Firm joined with its latest sustainability compliance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmSustainability {
    pub id: FirmId,
    pub name: String,
    pub sustainability_score: f64,
}
