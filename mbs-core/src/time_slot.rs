//! The fixed 48-slot partition of the day shared by every pipeline.

use crate::error::DataError;

/// Duration of one time slot, in minutes.
pub const SLOT_DURATION: usize = 30;

/// Number of slots per hour.
pub const SLOTS_PER_HOUR: usize = 60 / SLOT_DURATION;

/// Number of slots in a full day.
pub const SLOTS_PER_DAY: usize = 24 * SLOTS_PER_HOUR;

/// One 30-minute interval of the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub index: usize,
    /// Interval label, e.g. "13:30-14:00". Slot 47 wraps to "23:30-00:00".
    pub label: String,
}

/// The 48-entry time-slot table. Built once at startup, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotIndex {
    slots: Vec<TimeSlot>,
}

/// Start-of-slot time as "HH:MM", e.g. slot 27 -> "13:30".
///
/// Also used by the aggregation CLI when writing `time_slot_label` columns,
/// so the produced files and the index always agree.
pub fn slot_start_label(slot: usize) -> String {
    let hours = slot / SLOTS_PER_HOUR;
    let minutes = (slot % SLOTS_PER_HOUR) * SLOT_DURATION;
    format!("{:02}:{:02}", hours, minutes)
}

impl TimeSlotIndex {
    /// Build the full label table. Deterministic; no inputs beyond the slot
    /// constants.
    pub fn build() -> Self {
        let slots = (0..SLOTS_PER_DAY)
            .map(|index| TimeSlot {
                index,
                label: format!(
                    "{}-{}",
                    slot_start_label(index),
                    slot_start_label((index + 1) % SLOTS_PER_DAY)
                ),
            })
            .collect();
        TimeSlotIndex { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Interval label for a slot.
    pub fn label(&self, slot: usize) -> Result<&str, DataError> {
        self.slots
            .get(slot)
            .map(|s| s.label.as_str())
            .ok_or(DataError::OutOfRange {
                index: slot as i64,
                limit: SLOTS_PER_DAY,
            })
    }

    /// All labels in slot order, cloned for handoff to the render layer.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.label.clone()).collect()
    }
}

impl Default for TimeSlotIndex {
    fn default() -> Self {
        TimeSlotIndex::build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_has_48_slots() {
        let index = TimeSlotIndex::build();
        assert_eq!(index.len(), SLOTS_PER_DAY);
        assert_eq!(index.len(), 48);
    }

    #[test]
    fn test_label_format() {
        let index = TimeSlotIndex::build();
        for slot in index.slots() {
            let label = &slot.label;
            assert_eq!(label.len(), 11, "bad label {:?}", label);
            let bytes = label.as_bytes();
            assert_eq!(bytes[2], b':');
            assert_eq!(bytes[5], b'-');
            assert_eq!(bytes[8], b':');
            for pos in [0, 1, 3, 4, 6, 7, 9, 10] {
                assert!(bytes[pos].is_ascii_digit(), "bad label {:?}", label);
            }
        }
    }

    #[test]
    fn test_known_labels() {
        let index = TimeSlotIndex::build();
        assert_eq!(index.label(0).unwrap(), "00:00-00:30");
        assert_eq!(index.label(16).unwrap(), "08:00-08:30");
        assert_eq!(index.label(27).unwrap(), "13:30-14:00");
    }

    #[test]
    fn test_last_slot_wraps_to_midnight() {
        let index = TimeSlotIndex::build();
        assert_eq!(index.label(47).unwrap(), "23:30-00:00");
    }

    #[test]
    fn test_out_of_range_label() {
        let index = TimeSlotIndex::build();
        assert_eq!(
            index.label(48),
            Err(DataError::OutOfRange {
                index: 48,
                limit: 48
            })
        );
    }

    #[test]
    fn test_start_label() {
        assert_eq!(slot_start_label(0), "00:00");
        assert_eq!(slot_start_label(1), "00:30");
        assert_eq!(slot_start_label(47), "23:30");
    }
}
