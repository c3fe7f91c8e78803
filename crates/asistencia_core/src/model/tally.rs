//! Running attendance counts.

use crate::model::attendee::{AttendanceStatus, AttendeeRecord};

/// Per-status counts over an attendee list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub unmarked: usize,
}

impl AttendanceTally {
    /// Counts statuses over `records`.
    pub fn from_records(records: &[AttendeeRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut tally, record| {
                tally.total += 1;
                match record.status {
                    AttendanceStatus::Present => tally.present += 1,
                    AttendanceStatus::Absent => tally.absent += 1,
                    AttendanceStatus::Unmarked => tally.unmarked += 1,
                }
                tally
            })
    }

    /// Records with a present or absent mark.
    pub fn marked(&self) -> usize {
        self.present + self.absent
    }

    pub fn count(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Absent => self.absent,
            AttendanceStatus::Unmarked => self.unmarked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AttendanceTally;
    use crate::model::attendee::{AttendanceStatus, AttendeeRecord};

    #[test]
    fn counts_one_of_each_status() {
        let mut records = vec![
            AttendeeRecord::new("Ana"),
            AttendeeRecord::new("Beto"),
            AttendeeRecord::new("Carla"),
        ];
        records[0].status = AttendanceStatus::Present;
        records[1].status = AttendanceStatus::Absent;

        let tally = AttendanceTally::from_records(&records);
        assert_eq!(tally.total, 3);
        assert_eq!(tally.present, 1);
        assert_eq!(tally.absent, 1);
        assert_eq!(tally.unmarked, 1);
        assert_eq!(tally.marked(), 2);
    }

    #[test]
    fn empty_list_has_zero_counts() {
        assert_eq!(AttendanceTally::from_records(&[]), AttendanceTally::default());
    }
}
