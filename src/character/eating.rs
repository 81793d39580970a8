//! Fixed-capacity set of items currently being eaten.
//!
//! Order is irrelevant: removal swaps the finished item with the last slot, so
//! both insertion and completion are O(1).

use crate::constants::EATING_CAPACITY;
use arrayvec::ArrayVec;
use bevy::prelude::Entity;

/// Result of [`EatingQueue::try_begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EatAttempt {
    /// The item took a free slot.  `opens_mouth` is set when it is the only one.
    Started { opens_mouth: bool },
    /// The item already has a slot; nothing changed.
    AlreadyEating,
    /// Every slot is taken; nothing changed.
    Full,
}

impl EatAttempt {
    #[inline]
    pub fn accepted(self) -> bool {
        matches!(self, EatAttempt::Started { .. })
    }
}

/// In-progress consumptions, at most [`EATING_CAPACITY`] at once.
#[derive(Debug, Clone)]
pub struct EatingQueue<T = Entity> {
    slots: ArrayVec<T, EATING_CAPACITY>,
}

impl<T> Default for EatingQueue<T> {
    fn default() -> Self {
        Self {
            slots: ArrayVec::new(),
        }
    }
}

impl<T: Copy + PartialEq> EatingQueue<T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains(&self, item: T) -> bool {
        self.slots.contains(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.slots.iter().copied()
    }

    /// Claim a slot for `item`.
    pub fn try_begin(&mut self, item: T) -> EatAttempt {
        if self.contains(item) {
            return EatAttempt::AlreadyEating;
        }
        if self.slots.try_push(item).is_err() {
            return EatAttempt::Full;
        }
        EatAttempt::Started {
            opens_mouth: self.slots.len() == 1,
        }
    }

    /// Free `item`'s slot.  Returns the remaining occupancy, or `None` when the
    /// item was not being eaten (e.g. it was released by damage in between).
    pub fn complete(&mut self, item: T) -> Option<usize> {
        let index = self.slots.iter().position(|&slot| slot == item)?;
        self.slots.swap_remove(index);
        Some(self.slots.len())
    }

    /// Empty every slot, handing back the items whose consumption must abort.
    pub fn release_all(&mut self) -> ArrayVec<T, EATING_CAPACITY> {
        std::mem::take(&mut self.slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ninth_item_is_rejected() {
        let mut queue = EatingQueue::<u32>::default();
        for item in 0..8 {
            assert!(queue.try_begin(item).accepted(), "item {item} should fit");
        }
        assert_eq!(queue.try_begin(8), EatAttempt::Full);
        assert_eq!(queue.len(), 8);
        assert!(!queue.contains(8));
    }

    #[test]
    fn only_first_item_opens_mouth() {
        let mut queue = EatingQueue::<u32>::default();
        assert_eq!(queue.try_begin(1), EatAttempt::Started { opens_mouth: true });
        assert_eq!(queue.try_begin(2), EatAttempt::Started { opens_mouth: false });
    }

    #[test]
    fn completing_one_of_three_leaves_the_other_two() {
        let mut queue = EatingQueue::<char>::default();
        for item in ['A', 'B', 'C'] {
            queue.try_begin(item);
        }
        assert_eq!(queue.complete('C'), Some(2));
        let remaining: HashSet<char> = queue.iter().collect();
        assert_eq!(remaining, HashSet::from(['A', 'B']));

        assert_eq!(queue.complete('A'), Some(1));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec!['B']);
    }

    #[test]
    fn completing_unknown_item_is_none() {
        let mut queue = EatingQueue::<u32>::default();
        queue.try_begin(1);
        assert_eq!(queue.complete(7), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn repeated_begin_does_not_take_a_second_slot() {
        let mut queue = EatingQueue::<u32>::default();
        queue.try_begin(5);
        assert_eq!(queue.try_begin(5), EatAttempt::AlreadyEating);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn release_all_hands_back_every_item() {
        let mut queue = EatingQueue::<u32>::default();
        for item in 0..3 {
            queue.try_begin(item);
        }
        let released: HashSet<u32> = queue.release_all().into_iter().collect();
        assert_eq!(released, HashSet::from([0, 1, 2]));
        assert!(queue.is_empty());
        assert_eq!(queue.try_begin(9), EatAttempt::Started { opens_mouth: true });
    }
}
