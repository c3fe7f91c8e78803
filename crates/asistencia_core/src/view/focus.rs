//! Single-record focus navigation.
//!
//! # Invariants
//! - `index` stays within `[0, len - 1]`, and is `0` for an empty list.
//! - Navigation is by load order, independent of any list filter.

use crate::model::attendee::{AttendeeId, AttendeeRecord};

/// Cursor over the attendee list for the one-at-a-time view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusCursor {
    index: usize,
}

impl FocusCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cursor at `index`, clamped to `len`.
    pub fn at(index: usize, len: usize) -> Self {
        let mut cursor = Self { index };
        cursor.clamp(len);
        cursor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Pulls the index back into range after the list shrank.
    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Moves forward; stays on the last record.
    pub fn next(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
        self.clamp(len);
    }

    /// Moves back; stays on the first record.
    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Jumps to the record with `id`. Returns `false` if it is not listed.
    pub fn select(&mut self, records: &[AttendeeRecord], id: AttendeeId) -> bool {
        match records.iter().position(|record| record.id == id) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    pub fn current<'a>(&self, records: &'a [AttendeeRecord]) -> Option<&'a AttendeeRecord> {
        records.get(self.index)
    }

    /// One-based position text, e.g. `3 de 10`.
    pub fn position_label(&self, len: usize) -> String {
        if len == 0 {
            return "0 de 0".to_string();
        }
        format!("{} de {}", self.index + 1, len)
    }
}

#[cfg(test)]
mod tests {
    use super::FocusCursor;
    use crate::model::attendee::AttendeeRecord;
    use uuid::Uuid;

    fn records() -> Vec<AttendeeRecord> {
        ["Ana", "Beto", "Carla"]
            .into_iter()
            .map(AttendeeRecord::new)
            .collect()
    }

    #[test]
    fn navigation_is_clamped_at_both_ends() {
        let mut cursor = FocusCursor::new();
        cursor.previous();
        assert_eq!(cursor.index(), 0);
        assert!(!cursor.has_previous());

        for _ in 0..5 {
            cursor.next(3);
        }
        assert_eq!(cursor.index(), 2);
        assert!(!cursor.has_next(3));
        assert_eq!(cursor.position_label(3), "3 de 3");
    }

    #[test]
    fn clamp_follows_a_shrinking_list() {
        let mut cursor = FocusCursor::at(7, 10);
        assert_eq!(cursor.index(), 7);
        cursor.clamp(2);
        assert_eq!(cursor.index(), 1);
        cursor.clamp(0);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current(&[]), None);
    }

    #[test]
    fn select_jumps_to_original_index() {
        let records = records();
        let mut cursor = FocusCursor::new();
        assert!(cursor.select(&records, records[2].id));
        assert_eq!(cursor.current(&records).map(|r| r.name.as_str()), Some("Carla"));
        assert!(!cursor.select(&records, Uuid::new_v4()));
        assert_eq!(cursor.index(), 2);
    }
}
