// 📊 Single-Firm KPI Calculator

use crate::entities::{Firm, ForecastRecord, Settings};
use crate::resolver::latest_for_firm;
use crate::returns::{budget_consistent, derive_budget};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub estimated_return: f64,
    pub women_budget: f64,
    pub firm_name: Option<String>,
    pub budget_share: f64,
    pub consistent: bool,
}

impl KpiResult {
    /// Zero record returned when no firm is selected or it has no match
    pub fn empty(budget_share: f64) -> Self {
        KpiResult {
            estimated_return: 0.0,
            women_budget: 0.0,
            firm_name: None,
            budget_share,
            consistent: false,
        }
    }
}

/// KPIs for one firm.
///
/// `forecasts` may contain records of other firms; only the most recent
/// record of `firm` is used. Never fails: without a firm the zero record is
/// returned and the caller decides whether that means "not found".
pub fn compute_kpi(firm: Option<&Firm>, forecasts: &[ForecastRecord], settings: &Settings) -> KpiResult {
    let budget_share = settings.budget_share;

    let firm = match firm {
        Some(firm) => firm,
        None => return KpiResult::empty(budget_share),
    };

    let estimated = latest_for_firm(forecasts, firm.id).and_then(|r| r.estimated_return);
    let (estimated_return, women_budget) = derive_budget(estimated, budget_share);

    KpiResult {
        estimated_return,
        women_budget,
        firm_name: Some(firm.name.clone()),
        budget_share,
        consistent: budget_consistent(estimated_return, women_budget),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn forecast(firm_id: i64, estimated_return: f64, month: u32) -> ForecastRecord {
        ForecastRecord::new(
            firm_id,
            estimated_return,
            Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_no_firm_returns_zero_record() {
        let kpi = compute_kpi(None, &[], &Settings::default());

        assert_eq!(kpi, KpiResult::empty(0.72));
        assert!(!kpi.consistent);
        assert!(kpi.firm_name.is_none());
    }

    #[test]
    fn test_uses_latest_record_of_selected_firm() {
        let firm = Firm::new(1, "Anadolu Tekstil");
        let forecasts = vec![
            forecast(2, 9_000_000.0, 12),
            forecast(1, 2_000_000.0, 11),
            forecast(1, 1_000_000.0, 3),
        ];

        let kpi = compute_kpi(Some(&firm), &forecasts, &Settings::default());

        assert_eq!(kpi.estimated_return, 2_000_000.0);
        assert_eq!(kpi.women_budget, 1_440_000.0);
        assert_eq!(kpi.firm_name.as_deref(), Some("Anadolu Tekstil"));
        assert_eq!(kpi.budget_share, 0.72);
        assert!(kpi.consistent);
    }

    #[test]
    fn test_firm_without_forecast_is_zero_but_named() {
        let firm = Firm::new(5, "Yeni");
        let kpi = compute_kpi(Some(&firm), &[], &Settings::default());

        assert_eq!(kpi.estimated_return, 0.0);
        assert_eq!(kpi.women_budget, 0.0);
        assert_eq!(kpi.firm_name.as_deref(), Some("Yeni"));
        assert!(kpi.consistent);
    }

    #[test]
    fn test_inconsistent_when_share_exceeds_one() {
        let firm = Firm::new(1, "A");
        let settings = Settings {
            budget_share: 1.2,
            ..Settings::default()
        };

        let kpi = compute_kpi(Some(&firm), &[forecast(1, 100.0, 1)], &settings);

        assert_eq!(kpi.women_budget, 120.0);
        assert!(!kpi.consistent);
    }

    #[test]
    fn test_kpi_serializes_camel_case() {
        let json = serde_json::to_value(KpiResult::empty(0.72)).unwrap();

        assert_eq!(json["estimatedReturn"], 0.0);
        assert_eq!(json["womenBudget"], 0.0);
        assert!(json["firmName"].is_null());
        assert_eq!(json["budgetShare"], 0.72);
        assert_eq!(json["consistent"], false);
    }
}
