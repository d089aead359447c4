//! Arbitration between attribute failures.
//!
//! Every attribute rule runs, but only one failure is reported: the one in
//! the most important slot. Within a slot the first failure recorded wins,
//! which makes selection independent of anything but attribute order.

use crate::result::Mismatch;

/// Reporting priority of an attribute failure; lower is more important.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    /// `class`, or a dimension count that changes the implicit class.
    Class = 0,
    /// `tsp`.
    TimeSeries = 1,
    Dim = 2,
    Names = 3,
    RowNames = 4,
    DimNames = 5,
    /// Any other attribute.
    Other = 6,
    /// An attribute present on one side only.
    Presence = 7,
}

impl Priority {
    pub const COUNT: usize = 8;

    pub const ALL: [Priority; Priority::COUNT] = [
        Priority::Class,
        Priority::TimeSeries,
        Priority::Dim,
        Priority::Names,
        Priority::RowNames,
        Priority::DimNames,
        Priority::Other,
        Priority::Presence,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One optional failure per priority.
#[derive(Debug, Default)]
pub struct PrioritySlots {
    slots: [Option<Mismatch>; Priority::COUNT],
}

impl PrioritySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless the slot is already taken. Returns whether the
    /// failure was kept.
    pub fn record(&mut self, priority: Priority, mismatch: Mismatch) -> bool {
        let slot = &mut self.slots[priority.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(mismatch.with_priority(priority));
        true
    }

    pub fn is_set(&self, priority: Priority) -> bool {
        self.slots[priority.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The failure with the lowest priority number, if any.
    pub fn select(self) -> Option<Mismatch> {
        self.slots.into_iter().flatten().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::result::Description;

    fn failure(text: &str) -> Mismatch {
        Mismatch::new(ErrorKind::AttributeMissing, Description::new("have", text))
    }

    #[test]
    fn test_lowest_slot_wins() {
        let mut slots = PrioritySlots::new();
        slots.record(Priority::Presence, failure("presence"));
        slots.record(Priority::Names, failure("names"));
        slots.record(Priority::Other, failure("other"));
        let selected = slots.select().expect("a failure was recorded");
        assert_eq!(selected.target.text, "names");
        assert_eq!(selected.priority, Priority::Names);
    }

    #[test]
    fn test_first_failure_in_slot_is_kept() {
        let mut slots = PrioritySlots::new();
        assert!(slots.record(Priority::Other, failure("first")));
        assert!(!slots.record(Priority::Other, failure("second")));
        assert_eq!(slots.select().map(|m| m.target.text), Some("first".to_string()));
    }

    #[test]
    fn test_empty_selects_nothing() {
        let slots = PrioritySlots::new();
        assert!(slots.is_empty());
        assert!(slots.select().is_none());
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, p) in Priority::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }
}
