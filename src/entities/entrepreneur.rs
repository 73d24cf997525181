// 👩‍💼 Entrepreneur records and the caller-tunable scoring references

use crate::error::{DssError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrepreneurRecord {
    pub id: i64,
    pub business_name: String,

    /// Share of female staff, 0-100
    pub female_staff_ratio: f64,

    /// Share of disabled staff, 0-100
    pub disabled_staff_ratio: f64,

    pub founding_year: i32,
}

// ============================================================================
// SCORING PARAMETERS
// ============================================================================

pub const DEFAULT_REF_FEMALE_RATIO: f64 = 30.0;
pub const DEFAULT_REF_DISABLED_RATIO: f64 = 5.0;
pub const DEFAULT_REF_MIN_YEAR: i32 = 2015;

/// Reference values the DSS score is measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringParameters {
    /// Female staff ratio that earns the full 40 points
    pub ref_female_ratio: f64,

    /// Disabled staff ratio that earns the full 30 points
    pub ref_disabled_ratio: f64,

    /// Oldest founding year that still earns year points
    pub ref_min_year: i32,
}

impl Default for ScoringParameters {
    fn default() -> Self {
        ScoringParameters {
            ref_female_ratio: DEFAULT_REF_FEMALE_RATIO,
            ref_disabled_ratio: DEFAULT_REF_DISABLED_RATIO,
            ref_min_year: DEFAULT_REF_MIN_YEAR,
        }
    }
}

impl ScoringParameters {
    /// Reference ratios are divisors in the score; they must be finite and > 0
    pub fn validate(&self) -> Result<()> {
        let ratio_ok = |v: f64| v.is_finite() && v > 0.0;

        if !ratio_ok(self.ref_female_ratio)
            || !ratio_ok(self.ref_disabled_ratio)
            || self.ref_min_year <= 0
        {
            return Err(DssError::validation("Invalid DSS parameters"));
        }

        Ok(())
    }
}
