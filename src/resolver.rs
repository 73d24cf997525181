// 🕒 Latest-Record Resolver
// Reduces many forecast records per firm to the single most recent one.

use crate::entities::{FirmId, ForecastRecord};
use std::collections::HashMap;

/// Map each firm to its most recent record.
///
/// Trusts that `records` is already sorted by `created_at` descending (the
/// data layer orders it that way), so the first record seen for a firm wins.
pub fn resolve_latest(records: &[ForecastRecord]) -> HashMap<FirmId, ForecastRecord> {
    let mut latest: HashMap<FirmId, ForecastRecord> = HashMap::new();

    for record in records {
        latest
            .entry(record.firm_id)
            .or_insert_with(|| record.clone());
    }

    latest
}

/// Same as [`resolve_latest`] for input in arbitrary order.
///
/// Sorts descending by `created_at` first; the sort is stable, so records
/// with equal timestamps keep their input order and the earliest one wins.
pub fn resolve_latest_unordered(mut records: Vec<ForecastRecord>) -> HashMap<FirmId, ForecastRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    resolve_latest(&records)
}

/// Latest record for one firm only; same ordering contract as [`resolve_latest`]
pub fn latest_for_firm(records: &[ForecastRecord], firm_id: FirmId) -> Option<&ForecastRecord> {
    records.iter().find(|r| r.firm_id == firm_id)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(firm_id: FirmId, estimated_return: f64, day: u32) -> ForecastRecord {
        ForecastRecord::new(
            firm_id,
            estimated_return,
            Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_first_seen_wins_for_sorted_input() {
        let records = vec![
            record(1, 300.0, 20),
            record(2, 50.0, 19),
            record(1, 200.0, 10),
            record(2, 40.0, 5),
            record(1, 100.0, 1),
        ];

        let latest = resolve_latest(&records);

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&1].estimated_return, Some(300.0));
        assert_eq!(latest[&2].estimated_return, Some(50.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_latest(&[]).is_empty());
    }

    #[test]
    fn test_unordered_input_is_sorted_first() {
        let records = vec![
            record(1, 100.0, 1),
            record(1, 300.0, 20),
            record(1, 200.0, 10),
        ];

        let latest = resolve_latest_unordered(records);
        assert_eq!(latest[&1].estimated_return, Some(300.0));
    }

    #[test]
    fn test_timestamp_ties_keep_input_order() {
        let records = vec![
            record(1, 111.0, 7),
            record(1, 222.0, 7),
        ];

        assert_eq!(resolve_latest(&records)[&1].estimated_return, Some(111.0));
        assert_eq!(
            resolve_latest_unordered(records)[&1].estimated_return,
            Some(111.0)
        );
    }

    #[test]
    fn test_latest_for_firm() {
        let records = vec![record(2, 9.0, 9), record(1, 8.0, 8), record(1, 7.0, 7)];

        assert_eq!(
            latest_for_firm(&records, 1).map(|r| r.estimated_return),
            Some(Some(8.0))
        );
        assert!(latest_for_firm(&records, 3).is_none());
    }
}
