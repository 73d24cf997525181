// 📋 Dashboard service - one function per endpoint
//
// Wires the data access layer to the engine. Store failures become
// `DssError::Dependency`, except where the dashboard degrades to a
// documented default (settings, a single firm's forecasts).

use crate::db;
use crate::entities::{
    EntrepreneurRecord, Firm, FirmId, FirmRecycling, FirmSustainability, ScoringParameters, Settings,
};
use crate::error::{DssError, Result, StoreContext};
use crate::kpi::{compute_kpi, KpiResult};
use crate::ranking::{top_n, TopN};
use crate::returns::{aggregate_returns, FirmReturn};
use crate::scoring::{rank_entrepreneurs, EntrepreneurRanking};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SUSTAINABILITY_TOP_N: usize = 7;
pub const RECYCLING_TOP_N: usize = 10;

/// Chart payload for firm rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmChart<T> {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub firms: Vec<T>,
}

impl<T> From<TopN<T>> for FirmChart<T> {
    fn from(top: TopN<T>) -> Self {
        FirmChart {
            labels: top.labels,
            values: top.values,
            firms: top.entities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsOverview {
    pub firms: Vec<FirmReturn>,
    pub budget_share: f64,
}

/// Stored settings, or the defaults when missing or unreadable
pub fn load_settings(conn: &Connection) -> Settings {
    match db::fetch_settings(conn) {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(e) => {
            warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    }
}

pub fn list_firms(conn: &Connection) -> Result<Vec<Firm>> {
    db::fetch_firms(conn).store_context("Failed to load firms")
}

/// KPIs for the selected firm, or the zero record when none is selected
pub fn firm_kpis(conn: &Connection, firm_id: Option<FirmId>) -> Result<KpiResult> {
    let settings = load_settings(conn);

    let firm_id = match firm_id {
        Some(id) => id,
        None => return Ok(compute_kpi(None, &[], &settings)),
    };

    let firm = db::find_firm(conn, firm_id)
        .store_context("Failed to load KPI data")?
        .ok_or_else(|| DssError::not_found("Firm not found"))?;

    let forecasts = db::fetch_forecasts_for_firm(conn, firm_id).unwrap_or_else(|e| {
        warn!(firm_id, error = %e, "forecasts unavailable, reporting zero return");
        Vec::new()
    });

    let kpi = compute_kpi(Some(&firm), &forecasts, &settings);
    if !kpi.consistent {
        warn!(firm_id, estimated_return = kpi.estimated_return, women_budget = kpi.women_budget,
            "budget exceeds estimated return");
    }

    Ok(kpi)
}

pub fn all_returns(conn: &Connection) -> Result<ReturnsOverview> {
    let settings = load_settings(conn);

    let firms = db::fetch_firms(conn).store_context("Failed to load return data")?;
    if firms.is_empty() {
        return Ok(ReturnsOverview {
            firms: Vec::new(),
            budget_share: settings.budget_share,
        });
    }

    let latest = db::fetch_latest_forecast_per_firm(conn).store_context("Failed to load return data")?;
    let rows = aggregate_returns(&firms, &latest, settings.budget_share);

    for row in rows.iter().filter(|r| !r.is_consistent()) {
        warn!(firm_id = row.id, estimated_return = row.estimated_return,
            women_budget = row.women_budget, "budget exceeds estimated return");
    }

    Ok(ReturnsOverview {
        firms: rows,
        budget_share: settings.budget_share,
    })
}

/// Every firm with the sustainability score of its latest forecast (0 if none)
pub fn firms_with_sustainability(conn: &Connection) -> Result<Vec<FirmSustainability>> {
    let firms = db::fetch_firms(conn).store_context("Failed to load sustainability data")?;
    if firms.is_empty() {
        return Ok(Vec::new());
    }

    let latest = db::fetch_latest_forecast_per_firm(conn)
        .store_context("Failed to load sustainability data")?;

    Ok(firms
        .into_iter()
        .map(|firm| {
            let score = latest
                .get(&firm.id)
                .and_then(|r| r.sustainability_score)
                .unwrap_or(0.0);
            FirmSustainability {
                id: firm.id,
                name: firm.name,
                sustainability_score: score,
            }
        })
        .collect())
}

pub fn sustainability_top7(conn: &Connection) -> Result<FirmChart<FirmSustainability>> {
    let firms = firms_with_sustainability(conn)?;

    let top = top_n(
        firms,
        |f| f.sustainability_score,
        SUSTAINABILITY_TOP_N,
        |f| f.name.clone(),
    );

    Ok(top.into())
}

pub fn recycling_top10(conn: &Connection) -> Result<FirmChart<FirmRecycling>> {
    let firms = db::fetch_firm_recycling(conn).store_context("Failed to load recycling data")?;

    let top = top_n(firms, |f| f.recycling_rate, RECYCLING_TOP_N, |f| f.name.clone());

    Ok(top.into())
}

/// Entrepreneur ranking; `current_year` is the wall-clock year of the request
pub fn entrepreneur_top10(
    conn: &Connection,
    params: ScoringParameters,
    current_year: i32,
) -> Result<EntrepreneurRanking> {
    params.validate()?;

    let entrepreneurs: Vec<EntrepreneurRecord> =
        db::fetch_entrepreneurs(conn).store_context("Failed to load entrepreneur data")?;
    debug!(count = entrepreneurs.len(), current_year, "scoring entrepreneurs");

    Ok(rank_entrepreneurs(entrepreneurs, params, current_year))
}

// ============================================================================
// TESTS
// ============================================================================
