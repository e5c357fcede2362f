//! FIFO queue of combatants whose gauges are full.

use std::collections::VecDeque;

use crate::state::CombatantId;

/// Combatants that have reached threshold but not yet acted, in the order
/// they crossed it.
///
/// Enqueueing is idempotent. Entries for combatants that died while queued
/// are not filtered here; the scheduler skips them when dequeueing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadyQueue {
    entries: VecDeque<CombatantId>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` unless it is already queued. Returns true if it was added.
    pub fn push(&mut self, id: CombatantId) -> bool {
        if self.entries.contains(&id) {
            return false;
        }
        self.entries.push_back(id);
        true
    }

    pub fn pop(&mut self) -> Option<CombatantId> {
        self.entries.pop_front()
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.entries.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_is_idempotent_and_fifo() {
        let mut queue = ReadyQueue::new();
        assert!(queue.push(CombatantId(2)));
        assert!(queue.push(CombatantId(1)));
        assert!(!queue.push(CombatantId(2)));
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.pop(), Some(CombatantId(2)));
        assert!(queue.push(CombatantId(2)));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![CombatantId(1), CombatantId(2)]);
    }
}
