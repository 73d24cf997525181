// 🗄️ Data Access Layer - SQLite store for firms, forecasts, entrepreneurs, settings
//
// Read functions return raw rusqlite results; the dashboard service decides
// which failures degrade to defaults and which surface to the caller.

use crate::entities::{
    EntrepreneurRecord, Firm, FirmId, FirmRecycling, ForecastRecord, Settings,
};
use crate::resolver::resolve_latest;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use std::collections::HashMap;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL is not available for in-memory databases; SQLite reports "memory" there
    let _mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS firms (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            waste_amount REAL,
            recycling_rate REAL
        );

        CREATE TABLE IF NOT EXISTS forecasts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            firm_id INTEGER NOT NULL REFERENCES firms(id),
            estimated_return REAL,
            sustainability_score REAL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entrepreneurs (
            id INTEGER PRIMARY KEY,
            business_name TEXT NOT NULL,
            female_staff_ratio REAL,
            disabled_staff_ratio REAL,
            founding_year INTEGER
        );

        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            budget_share REAL,
            carbon_threshold REAL
        );

        CREATE INDEX IF NOT EXISTS idx_forecasts_firm ON forecasts(firm_id);
        CREATE INDEX IF NOT EXISTS idx_forecasts_created ON forecasts(created_at);
        CREATE INDEX IF NOT EXISTS idx_firms_name ON firms(name);",
    )?;

    Ok(())
}

/// True when the store answers a trivial query
pub fn ping(conn: &Connection) -> bool {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).is_ok()
}

// ============================================================================
// FIRMS
// ============================================================================

/// All firms, ordered by name
pub fn fetch_firms(conn: &Connection) -> Result<Vec<Firm>> {
    let mut stmt = conn.prepare("SELECT id, name FROM firms ORDER BY name ASC, id ASC")?;

    let firms = stmt
        .query_map([], |row| {
            Ok(Firm {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(firms)
}

pub fn find_firm(conn: &Connection, firm_id: FirmId) -> Result<Option<Firm>> {
    conn.query_row(
        "SELECT id, name FROM firms WHERE id = ?1",
        [firm_id],
        |row| {
            Ok(Firm {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
}

pub fn fetch_firm_recycling(conn: &Connection) -> Result<Vec<FirmRecycling>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, waste_amount, recycling_rate FROM firms ORDER BY id ASC",
    )?;

    let firms = stmt
        .query_map([], |row| {
            let rate: Option<f64> = row.get(3)?;
            Ok(FirmRecycling {
                id: row.get(0)?,
                name: row.get(1)?,
                waste_amount: row.get(2)?,
                recycling_rate: rate.unwrap_or(0.0),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(firms)
}

pub fn insert_firms(conn: &Connection, firms: &[FirmRecycling]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO firms (id, name, waste_amount, recycling_rate)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                waste_amount = excluded.waste_amount,
                recycling_rate = excluded.recycling_rate",
        )?;
        for firm in firms {
            inserted += stmt.execute(params![
                firm.id,
                firm.name,
                firm.waste_amount,
                firm.recycling_rate
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

// ============================================================================
// FORECASTS
// ============================================================================

const FORECAST_COLUMNS: &str =
    "firm_id, estimated_return, sustainability_score, created_at";

fn forecast_from_row(row: &Row<'_>) -> Result<ForecastRecord> {
    Ok(ForecastRecord {
        firm_id: row.get(0)?,
        estimated_return: row.get(1)?,
        sustainability_score: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Every forecast, newest first; equal timestamps keep insertion order
pub fn fetch_forecasts(conn: &Connection) -> Result<Vec<ForecastRecord>> {
    let sql = format!(
        "SELECT {} FROM forecasts ORDER BY created_at DESC, id ASC",
        FORECAST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let records = stmt
        .query_map([], forecast_from_row)?
        .collect::<Result<Vec<_>>>()?;

    Ok(records)
}

pub fn fetch_forecasts_for_firm(conn: &Connection, firm_id: FirmId) -> Result<Vec<ForecastRecord>> {
    let sql = format!(
        "SELECT {} FROM forecasts WHERE firm_id = ?1 ORDER BY created_at DESC, id ASC",
        FORECAST_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;

    let records = stmt
        .query_map([firm_id], forecast_from_row)?
        .collect::<Result<Vec<_>>>()?;

    Ok(records)
}

pub fn fetch_latest_forecast_per_firm(conn: &Connection) -> Result<HashMap<FirmId, ForecastRecord>> {
    let records = fetch_forecasts(conn)?;
    Ok(resolve_latest(&records))
}

pub fn insert_forecasts(conn: &Connection, records: &[ForecastRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO forecasts (firm_id, estimated_return, sustainability_score, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for record in records {
            inserted += stmt.execute(params![
                record.firm_id,
                record.estimated_return,
                record.sustainability_score,
                record.created_at
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

// ============================================================================
// ENTREPRENEURS
// ============================================================================

pub fn fetch_entrepreneurs(conn: &Connection) -> Result<Vec<EntrepreneurRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, business_name, female_staff_ratio, disabled_staff_ratio, founding_year
         FROM entrepreneurs
         ORDER BY id ASC",
    )?;

    let records = stmt
        .query_map([], |row| {
            let female: Option<f64> = row.get(2)?;
            let disabled: Option<f64> = row.get(3)?;
            let founded: Option<i32> = row.get(4)?;

            Ok(EntrepreneurRecord {
                id: row.get(0)?,
                business_name: row.get(1)?,
                female_staff_ratio: female.unwrap_or(0.0),
                disabled_staff_ratio: disabled.unwrap_or(0.0),
                founding_year: founded.unwrap_or(0),
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(records)
}

pub fn insert_entrepreneurs(conn: &Connection, records: &[EntrepreneurRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO entrepreneurs
                (id, business_name, female_staff_ratio, disabled_staff_ratio, founding_year)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                business_name = excluded.business_name,
                female_staff_ratio = excluded.female_staff_ratio,
                disabled_staff_ratio = excluded.disabled_staff_ratio,
                founding_year = excluded.founding_year",
        )?;
        for e in records {
            inserted += stmt.execute(params![
                e.id,
                e.business_name,
                e.female_staff_ratio,
                e.disabled_staff_ratio,
                e.founding_year
            ])?;
        }
    }

    tx.commit()?;
    Ok(inserted)
}

// ============================================================================
// SETTINGS
// ============================================================================

/// The settings row, or `None` when it was never written
pub fn fetch_settings(conn: &Connection) -> Result<Option<Settings>> {
    conn.query_row(
        "SELECT budget_share, carbon_threshold FROM settings WHERE id = 1",
        [],
        |row| Ok(Settings::from_stored(row.get(0)?, row.get(1)?)),
    )
    .optional()
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (id, budget_share, carbon_threshold) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
            budget_share = excluded.budget_share,
            carbon_threshold = excluded.carbon_threshold",
        params![settings.budget_share, settings.carbon_threshold],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn firm(id: FirmId, name: &str, rate: f64) -> FirmRecycling {
        FirmRecycling {
            id,
            name: name.to_string(),
            waste_amount: Some(100.0),
            recycling_rate: rate,
        }
    }

    fn forecast(firm_id: FirmId, estimated_return: f64, day: u32) -> ForecastRecord {
        ForecastRecord::new(
            firm_id,
            estimated_return,
            Utc.with_ymd_and_hms(2024, 5, day, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = test_db();
        setup_database(&conn).unwrap();
        assert!(ping(&conn));
    }

    #[test]
    fn test_firms_ordered_by_name() {
        let conn = test_db();
        insert_firms(&conn, &[firm(1, "Zeytin", 1.0), firm(2, "Ayva", 2.0), firm(3, "Mersin", 0.0)])
            .unwrap();

        let names: Vec<String> = fetch_firms(&conn).unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Ayva", "Mersin", "Zeytin"]);
    }

    #[test]
    fn test_find_firm() {
        let conn = test_db();
        insert_firms(&conn, &[firm(7, "Kapadokya", 0.0)]).unwrap();

        assert_eq!(find_firm(&conn, 7).unwrap(), Some(Firm::new(7, "Kapadokya")));
        assert_eq!(find_firm(&conn, 8).unwrap(), None);
    }

    #[test]
    fn test_forecasts_newest_first_and_timestamps_round_trip() {
        let conn = test_db();
        insert_firms(&conn, &[firm(1, "A", 0.0), firm(2, "B", 0.0)]).unwrap();
        insert_forecasts(
            &conn,
            &[forecast(1, 10.0, 1), forecast(2, 20.0, 15), forecast(1, 30.0, 28)],
        )
        .unwrap();

        let records = fetch_forecasts(&conn).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].estimated_return, Some(30.0));
        assert_eq!(records[0].created_at, Utc.with_ymd_and_hms(2024, 5, 28, 9, 30, 0).unwrap());
        assert_eq!(records[2].estimated_return, Some(10.0));
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let conn = test_db();
        insert_firms(&conn, &[firm(1, "A", 0.0)]).unwrap();
        insert_forecasts(&conn, &[forecast(1, 1.0, 3), forecast(1, 2.0, 3)]).unwrap();

        let latest = fetch_latest_forecast_per_firm(&conn).unwrap();
        assert_eq!(latest[&1].estimated_return, Some(1.0));
    }

    #[test]
    fn test_forecasts_for_firm() {
        let conn = test_db();
        insert_firms(&conn, &[firm(1, "A", 0.0), firm(2, "B", 0.0)]).unwrap();
        insert_forecasts(&conn, &[forecast(1, 10.0, 1), forecast(2, 20.0, 2)]).unwrap();

        let records = fetch_forecasts_for_firm(&conn, 2).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].firm_id, 2);
    }

    #[test]
    fn test_recycling_missing_rate_reads_as_zero() {
        let conn = test_db();
        conn.execute("INSERT INTO firms (id, name) VALUES (1, 'Bos')", []).unwrap();

        let rows = fetch_firm_recycling(&conn).unwrap();
        assert_eq!(rows[0].recycling_rate, 0.0);
        assert_eq!(rows[0].waste_amount, None);
    }

    #[test]
    fn test_entrepreneurs_round_trip() {
        let conn = test_db();
        let record = EntrepreneurRecord {
            id: 4,
            business_name: "Ege Seramik".to_string(),
            female_staff_ratio: 45.0,
            disabled_staff_ratio: 3.5,
            founding_year: 2019,
        };
        insert_entrepreneurs(&conn, &[record.clone()]).unwrap();

        assert_eq!(fetch_entrepreneurs(&conn).unwrap(), vec![record]);
    }

    #[test]
    fn test_settings_absent_then_saved() {
        let conn = test_db();
        assert_eq!(fetch_settings(&conn).unwrap(), None);

        save_settings(&conn, &Settings { budget_share: 0.6, carbon_threshold: 4000.0 }).unwrap();
        save_settings(&conn, &Settings { budget_share: 0.65, carbon_threshold: 4200.0 }).unwrap();

        let settings = fetch_settings(&conn).unwrap().unwrap();
        assert_eq!(settings.budget_share, 0.65);
        assert_eq!(settings.carbon_threshold, 4200.0);
    }

    #[test]
    fn test_settings_zero_share_falls_back() {
        let conn = test_db();
        conn.execute("INSERT INTO settings (id, budget_share) VALUES (1, 0)", []).unwrap();

        let settings = fetch_settings(&conn).unwrap().unwrap();
        assert_eq!(settings.budget_share, 0.72);
    }
}
