// 📥 CSV import - seeds the store from spreadsheet exports
//
// Headers use the store's column names, e.g. for forecasts:
//   firm_id,estimated_return,sustainability_score,created_at
// Timestamps are RFC 3339 (`2024-05-28T09:30:00Z`).

use crate::db;
use crate::entities::{EntrepreneurRecord, FirmRecycling, ForecastRecord, Settings};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Which table a CSV file feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Firms,
    Forecasts,
    Entrepreneurs,
    Settings,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Firms => "firms",
            ImportKind::Forecasts => "forecasts",
            ImportKind::Entrepreneurs => "entrepreneurs",
            ImportKind::Settings => "settings",
        }
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firms" => Ok(ImportKind::Firms),
            "forecasts" => Ok(ImportKind::Forecasts),
            "entrepreneurs" => Ok(ImportKind::Entrepreneurs),
            "settings" => Ok(ImportKind::Settings),
            other => Err(format!(
                "unknown table '{}' (expected firms, forecasts, entrepreneurs or settings)",
                other
            )),
        }
    }
}

// ============================================================================
// CSV ROWS
// ============================================================================

#[derive(Debug, Deserialize)]
struct FirmRow {
    id: i64,
    name: String,
    waste_amount: Option<f64>,
    recycling_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastRow {
    firm_id: i64,
    estimated_return: Option<f64>,
    sustainability_score: Option<f64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct EntrepreneurRow {
    id: i64,
    business_name: String,
    female_staff_ratio: Option<f64>,
    disabled_staff_ratio: Option<f64>,
    founding_year: i32,
}

#[derive(Debug, Deserialize)]
struct SettingsRow {
    budget_share: Option<f64>,
    carbon_threshold: Option<f64>,
}

pub fn load_csv<T: DeserializeOwned>(csv_path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file: {:?}", csv_path))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        // line 1 is the header
        let row: T = result.with_context(|| format!("Failed to parse CSV line {}", i + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Load `csv_path` into the table named by `kind`; returns rows written
pub fn import_csv(conn: &Connection, kind: ImportKind, csv_path: &Path) -> Result<usize> {
    let written = match kind {
        ImportKind::Firms => {
            let firms: Vec<FirmRecycling> = load_csv::<FirmRow>(csv_path)?
                .into_iter()
                .map(|r| FirmRecycling {
                    id: r.id,
                    name: r.name,
                    waste_amount: r.waste_amount,
                    recycling_rate: r.recycling_rate.unwrap_or(0.0),
                })
                .collect();
            db::insert_firms(conn, &firms).context("Failed to insert firms")?
        }
        ImportKind::Forecasts => {
            let records: Vec<ForecastRecord> = load_csv::<ForecastRow>(csv_path)?
                .into_iter()
                .map(|r| ForecastRecord {
                    firm_id: r.firm_id,
                    estimated_return: r.estimated_return,
                    sustainability_score: r.sustainability_score,
                    created_at: r.created_at,
                })
                .collect();
            db::insert_forecasts(conn, &records)
                .context("Failed to insert forecasts (are the firms imported?)")?
        }
        ImportKind::Entrepreneurs => {
            let records: Vec<EntrepreneurRecord> = load_csv::<EntrepreneurRow>(csv_path)?
                .into_iter()
                .map(|r| EntrepreneurRecord {
                    id: r.id,
                    business_name: r.business_name,
                    female_staff_ratio: r.female_staff_ratio.unwrap_or(0.0),
                    disabled_staff_ratio: r.disabled_staff_ratio.unwrap_or(0.0),
                    founding_year: r.founding_year,
                })
                .collect();
            db::insert_entrepreneurs(conn, &records).context("Failed to insert entrepreneurs")?
        }
        ImportKind::Settings => {
            // singleton: the last row wins
            let row = load_csv::<SettingsRow>(csv_path)?
                .pop()
                .context("Settings CSV has no data row")?;
            let settings = Settings::from_stored(row.budget_share, row.carbon_threshold);
            db::save_settings(conn, &settings).context("Failed to save settings")?;
            1
        }
    };

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_import_kind_parse() {
        assert_eq!("firms".parse::<ImportKind>(), Ok(ImportKind::Firms));
        assert_eq!("Forecasts".parse::<ImportKind>(), Ok(ImportKind::Forecasts));
        assert!("transactions".parse::<ImportKind>().is_err());
        assert_eq!(ImportKind::Entrepreneurs.as_str(), "entrepreneurs");
    }

    #[test]
    fn test_import_firms_and_forecasts() {
        let conn = test_db();
        let firms = csv_file(
            "id,name,waste_amount,recycling_rate\n\
             1,Marmara Kagit,1200,35.5\n\
             2,Toros Tarim,,\n",
        );
        let forecasts = csv_file(
            "firm_id,estimated_return,sustainability_score,created_at\n\
             1,2500000,81,2024-05-01T10:00:00Z\n\
             1,3000000,84,2024-06-01T10:00:00Z\n\
             2,,40,2024-06-02T08:15:00+03:00\n",
        );

        assert_eq!(import_csv(&conn, ImportKind::Firms, firms.path()).unwrap(), 2);
        assert_eq!(import_csv(&conn, ImportKind::Forecasts, forecasts.path()).unwrap(), 3);

        let latest = db::fetch_latest_forecast_per_firm(&conn).unwrap();
        assert_eq!(latest[&1].estimated_return, Some(3_000_000.0));
        assert_eq!(latest[&2].estimated_return, None);
        assert_eq!(latest[&2].sustainability_score, Some(40.0));

        let recycling = db::fetch_firm_recycling(&conn).unwrap();
        assert_eq!(recycling[0].recycling_rate, 35.5);
        assert_eq!(recycling[1].recycling_rate, 0.0);
    }

    #[test]
    fn test_import_forecast_for_unknown_firm_fails() {
        let conn = test_db();
        let forecasts = csv_file(
            "firm_id,estimated_return,sustainability_score,created_at\n\
             42,100,1,2024-05-01T10:00:00Z\n",
        );

        assert!(import_csv(&conn, ImportKind::Forecasts, forecasts.path()).is_err());
    }

    #[test]
    fn test_import_entrepreneurs_and_settings() {
        let conn = test_db();
        let entrepreneurs = csv_file(
            "id,business_name,female_staff_ratio,disabled_staff_ratio,founding_year\n\
             1,Ege Seramik,45,3,2019\n\
             2,Karadeniz Cay,25,,2012\n",
        );
        let settings = csv_file("budget_share,carbon_threshold\n0.65,4500\n");

        assert_eq!(import_csv(&conn, ImportKind::Entrepreneurs, entrepreneurs.path()).unwrap(), 2);
        assert_eq!(import_csv(&conn, ImportKind::Settings, settings.path()).unwrap(), 1);

        let rows = db::fetch_entrepreneurs(&conn).unwrap();
        assert_eq!(rows[1].disabled_staff_ratio, 0.0);
        assert_eq!(db::fetch_settings(&conn).unwrap().unwrap().budget_share, 0.65);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let conn = test_db();
        let firms = csv_file("id,name,waste_amount,recycling_rate\nnot-a-number,X,,\n");

        let err = import_csv(&conn, ImportKind::Firms, firms.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_empty_settings_file() {
        let conn = test_db();
        let settings = csv_file("budget_share,carbon_threshold\n");

        assert!(import_csv(&conn, ImportKind::Settings, settings.path()).is_err());
    }
}
