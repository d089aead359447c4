//! Bidirectional symbol mapping with checkpoint and rollback.
//!
//! While comparing two expressions, each target symbol may stand for exactly
//! one current symbol and vice versa. Insertions are logged so a comparison
//! that backtracks (trying the swapped operands of a commutative operator)
//! can undo exactly the bindings it made.

use alike_value::Symbol;
use std::collections::HashMap;
use tracing::trace;

/// Index of a target symbol's binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(u32);

impl Slot {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A point in the insertion log to roll back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

/// Outcome of binding a target symbol to a current symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Both symbols were unbound; they are now paired.
    Fresh(Slot),
    /// The same pair was bound before.
    Consistent(Slot),
    /// The target symbol is already paired with `expected`.
    Inconsistent { expected: Symbol },
    /// The current symbol already stands for target symbol `taken_by`.
    Taken { taken_by: Symbol },
}

impl Binding {
    pub fn is_consistent(&self) -> bool {
        matches!(self, Binding::Fresh(_) | Binding::Consistent(_))
    }
}

#[derive(Debug, Clone)]
enum LogEntry {
    Target,
    Current(Symbol),
}

/// Target/current symbol pairs.
#[derive(Debug, Clone, Default)]
pub struct HashMapping {
    by_target: HashMap<Symbol, Slot>,
    by_current: HashMap<Symbol, Slot>,
    slots: Vec<(Symbol, Option<Symbol>)>,
    log: Vec<LogEntry>,
}

impl HashMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_target: HashMap::with_capacity(capacity),
            by_current: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            log: Vec::with_capacity(capacity * 2),
        }
    }

    /// Number of target symbols with a slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Give `target` a slot, returning the existing one if it has one.
    /// The flag is true when a new slot was created.
    pub fn insert(&mut self, target: &Symbol) -> (Slot, bool) {
        if let Some(&slot) = self.by_target.get(target) {
            return (slot, false);
        }
        let slot = Slot(self.slots.len() as u32);
        self.slots.push((target.clone(), None));
        self.by_target.insert(target.clone(), slot);
        self.log.push(LogEntry::Target);
        (slot, true)
    }

    /// Slot of a target symbol.
    pub fn lookup_target(&self, target: &str) -> Option<Slot> {
        self.by_target.get(target).copied()
    }

    /// Slot whose target the current symbol stands for.
    pub fn lookup_current(&self, current: &str) -> Option<Slot> {
        self.by_current.get(current).copied()
    }

    /// The current symbol bound to a slot.
    pub fn counterpart(&self, slot: Slot) -> Option<&Symbol> {
        self.slots.get(slot.index()).and_then(|(_, c)| c.as_ref())
    }

    /// The target symbol owning a slot.
    pub fn target_of(&self, slot: Slot) -> Option<&Symbol> {
        self.slots.get(slot.index()).map(|(t, _)| t)
    }

    /// Pair `target` with `current`, enforcing a one-to-one mapping.
    pub fn bind(&mut self, target: &Symbol, current: &Symbol) -> Binding {
        if let Some(slot) = self.lookup_target(target.as_str()) {
            return match self.counterpart(slot) {
                Some(bound) if bound == current => Binding::Consistent(slot),
                Some(bound) => Binding::Inconsistent {
                    expected: bound.clone(),
                },
                None => self.pair(slot, current),
            };
        }
        if let Some(slot) = self.lookup_current(current.as_str()) {
            let taken_by = self.slots[slot.index()].0.clone();
            return Binding::Taken { taken_by };
        }
        let (slot, _) = self.insert(target);
        self.pair(slot, current)
    }

    fn pair(&mut self, slot: Slot, current: &Symbol) -> Binding {
        if let Some(&other) = self.by_current.get(current) {
            return Binding::Taken {
                taken_by: self.slots[other.index()].0.clone(),
            };
        }
        self.slots[slot.index()].1 = Some(current.clone());
        self.by_current.insert(current.clone(), slot);
        self.log.push(LogEntry::Current(current.clone()));
        Binding::Fresh(slot)
    }

    /// Current position in the insertion log.
    pub fn checkpoint(&self) -> Mark {
        Mark(self.log.len())
    }

    /// Undo every insertion made after `mark`.
    pub fn rollback(&mut self, mark: Mark) {
        let undone = self.log.len().saturating_sub(mark.0);
        while self.log.len() > mark.0 {
            match self.log.pop() {
                Some(LogEntry::Target) => {
                    if let Some((target, _)) = self.slots.pop() {
                        self.by_target.remove(&target);
                    }
                }
                Some(LogEntry::Current(current)) => {
                    if let Some(slot) = self.by_current.remove(&current) {
                        self.slots[slot.index()].1 = None;
                    }
                }
                None => break,
            }
        }
        if undone > 0 {
            trace!(undone, remaining = self.slots.len(), "rolled back symbol bindings");
        }
    }

    /// Drop all bindings.
    pub fn clear(&mut self) {
        self.by_target.clear();
        self.by_current.clear();
        self.slots.clear();
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol {
        Symbol::new(s)
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut map = HashMapping::new();
        let (a, fresh) = map.insert(&sym("a"));
        assert!(fresh);
        let (again, fresh) = map.insert(&sym("a"));
        assert!(!fresh);
        assert_eq!(a, again);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_bijection() {
        let mut map = HashMapping::new();
        assert!(matches!(map.bind(&sym("a"), &sym("x")), Binding::Fresh(_)));
        assert!(matches!(map.bind(&sym("a"), &sym("x")), Binding::Consistent(_)));
        assert_eq!(
            map.bind(&sym("a"), &sym("y")),
            Binding::Inconsistent { expected: sym("x") }
        );
        assert_eq!(
            map.bind(&sym("b"), &sym("x")),
            Binding::Taken { taken_by: sym("a") }
        );
        // a failed bind leaves no trace
        assert_eq!(map.lookup_target("b"), None);
    }

    #[test]
    fn test_rollback_restores_state() {
        let mut map = HashMapping::new();
        map.bind(&sym("a"), &sym("x"));
        let mark = map.checkpoint();
        map.bind(&sym("b"), &sym("y"));
        map.bind(&sym("c"), &sym("z"));
        assert_eq!(map.len(), 3);

        map.rollback(mark);
        assert_eq!(map.len(), 1);
        assert_eq!(map.checkpoint(), mark);
        assert_eq!(map.lookup_current("y"), None);
        assert_eq!(map.lookup_target("c"), None);
        assert!(matches!(map.bind(&sym("a"), &sym("x")), Binding::Consistent(_)));
        // y is free again
        assert!(matches!(map.bind(&sym("c"), &sym("y")), Binding::Fresh(_)));
    }

    #[test]
    fn test_rollback_unbinds_existing_slot() {
        let mut map = HashMapping::new();
        let (slot, _) = map.insert(&sym("a"));
        let mark = map.checkpoint();
        map.bind(&sym("a"), &sym("x"));
        assert_eq!(map.counterpart(slot), Some(&sym("x")));
        map.rollback(mark);
        assert_eq!(map.counterpart(slot), None);
        assert_eq!(map.target_of(slot), Some(&sym("a")));
    }
}
