//! Searchable list and progress projections.

use crate::model::attendee::AttendeeRecord;
use crate::model::tally::AttendanceTally;

/// Filters records whose name contains `term`, ignoring case.
///
/// The term is matched as typed, whitespace included. Only an empty term
/// returns every record. Load order is preserved.
pub fn filter_by_name<'a>(records: &'a [AttendeeRecord], term: &str) -> Vec<&'a AttendeeRecord> {
    if term.is_empty() {
        return records.iter().collect();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .collect()
}

/// Share of marked records, in percent. `0.0` for an empty list.
pub fn progress_percent(records: &[AttendeeRecord]) -> f64 {
    let tally = AttendanceTally::from_records(records);
    if tally.total == 0 {
        return 0.0;
    }
    tally.marked() as f64 / tally.total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::{filter_by_name, progress_percent};
    use crate::model::attendee::{AttendanceStatus, AttendeeRecord};

    fn records() -> Vec<AttendeeRecord> {
        ["Ana María", "Beto", "Mariana"]
            .into_iter()
            .map(AttendeeRecord::new)
            .collect()
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_order() {
        let records = records();
        let names: Vec<&str> = filter_by_name(&records, "MAR")
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana María", "Mariana"]);
    }

    #[test]
    fn only_empty_term_returns_everything() {
        let records = records();
        assert_eq!(filter_by_name(&records, "").len(), 3);
        assert!(filter_by_name(&records, "  ").is_empty());
        assert_eq!(filter_by_name(&records, "a m").len(), 1);
        assert!(filter_by_name(&records, "zoe").is_empty());
    }

    #[test]
    fn progress_counts_present_and_absent() {
        let mut records = records();
        assert_eq!(progress_percent(&records), 0.0);
        records[0].status = AttendanceStatus::Present;
        records[1].status = AttendanceStatus::Absent;
        let progress = progress_percent(&records);
        assert!((progress - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(progress_percent(&[]), 0.0);
    }
}
