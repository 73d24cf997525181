// 🎯 Entrepreneur Scoring - composite 0-100 DSS score
//
//   female   = min(40, female_ratio   / ref_female_ratio   * 40)
//   disabled = min(30, disabled_ratio / ref_disabled_ratio * 30)
//   year     = min(30, (max_age - age) / max_age * 30)   (0 when max_age <= 0)
//   score    = max(0, female + disabled + year)
//
// Younger firms earn more year points; firms older than max_age get a
// negative year term, which the final floor can absorb.

use crate::entities::{EntrepreneurRecord, ScoringParameters};
use crate::ranking::{top_n, TopN};
use serde::{Deserialize, Serialize};

pub const MAX_FEMALE_POINTS: f64 = 40.0;
pub const MAX_DISABLED_POINTS: f64 = 30.0;
pub const MAX_YEAR_POINTS: f64 = 30.0;

/// Number of entrepreneurs shown on the chart
pub const ENTREPRENEUR_TOP_N: usize = 10;

/// Individual terms of a score, before the floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub female_score: f64,
    pub disabled_score: f64,
    pub year_score: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        (self.female_score + self.disabled_score + self.year_score).max(0.0)
    }
}

/// Score terms for one entrepreneur.
///
/// `params` must have passed [`ScoringParameters::validate`]; the reference
/// ratios are divisors and are not checked here. `current_year` is passed in
/// by the caller, so results change at year boundaries only through it.
pub fn score_breakdown(
    entrepreneur: &EntrepreneurRecord,
    params: &ScoringParameters,
    current_year: i32,
) -> ScoreBreakdown {
    let female_score = (entrepreneur.female_staff_ratio / params.ref_female_ratio
        * MAX_FEMALE_POINTS)
        .min(MAX_FEMALE_POINTS);

    let disabled_score = (entrepreneur.disabled_staff_ratio / params.ref_disabled_ratio
        * MAX_DISABLED_POINTS)
        .min(MAX_DISABLED_POINTS);

    // stored years are unchecked; subtract in f64 so extremes cannot overflow
    let age = f64::from(current_year) - f64::from(entrepreneur.founding_year);
    let max_age = f64::from(current_year) - f64::from(params.ref_min_year);
    let year_score = if max_age > 0.0 {
        ((max_age - age) / max_age * MAX_YEAR_POINTS).min(MAX_YEAR_POINTS)
    } else {
        0.0
    };

    ScoreBreakdown {
        female_score,
        disabled_score,
        year_score,
    }
}

pub fn score_entrepreneur(
    entrepreneur: &EntrepreneurRecord,
    params: &ScoringParameters,
    current_year: i32,
) -> f64 {
    score_breakdown(entrepreneur, params, current_year).total()
}

// ============================================================================
// RANKING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntrepreneur {
    #[serde(flatten)]
    pub record: EntrepreneurRecord,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrepreneurRanking {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub entrepreneurs: Vec<ScoredEntrepreneur>,
    pub parameters: ScoringParameters,
}

impl EntrepreneurRanking {
    fn from_top(top: TopN<ScoredEntrepreneur>, parameters: ScoringParameters) -> Self {
        EntrepreneurRanking {
            labels: top.labels,
            values: top.values,
            entrepreneurs: top.entities,
            parameters,
        }
    }
}

/// Score everyone and keep the best [`ENTREPRENEUR_TOP_N`]
pub fn rank_entrepreneurs(
    entrepreneurs: Vec<EntrepreneurRecord>,
    params: ScoringParameters,
    current_year: i32,
) -> EntrepreneurRanking {
    let scored: Vec<ScoredEntrepreneur> = entrepreneurs
        .into_iter()
        .map(|record| {
            let score = score_entrepreneur(&record, &params, current_year);
            ScoredEntrepreneur { record, score }
        })
        .collect();

    let top = top_n(
        scored,
        |e| e.score,
        ENTREPRENEUR_TOP_N,
        |e| e.record.business_name.clone(),
    );

    EntrepreneurRanking::from_top(top, params)
}

// ============================================================================
// TESTS
// ============================================================================
