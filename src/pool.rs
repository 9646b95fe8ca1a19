//! Working set of orders for one clustering run.
//!
//! An index arena over the caller's slice: entries are never moved, only
//! marked consumed, so iteration order is always input order.

use crate::traits::Errand;

#[derive(Debug)]
pub struct OrderPool<'a, E> {
    entries: Vec<&'a E>,
    consumed: Vec<bool>,
    remaining: usize,
}

impl<'a, E: Errand> OrderPool<'a, E> {
    pub fn new(orders: impl IntoIterator<Item = &'a E>) -> Self {
        let entries: Vec<&'a E> = orders.into_iter().collect();
        let remaining = entries.len();
        Self {
            consumed: vec![false; remaining],
            entries,
            remaining,
        }
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Remove and return the earliest unconsumed order.
    pub fn pop_front(&mut self) -> Option<&'a E> {
        let index = self.consumed.iter().position(|taken| !taken)?;
        self.take(index)
    }

    /// Remove the order at `index`. None if already consumed.
    pub fn take(&mut self, index: usize) -> Option<&'a E> {
        match self.consumed.get(index) {
            Some(false) => {
                self.consumed[index] = true;
                self.remaining -= 1;
                Some(self.entries[index])
            }
            _ => None,
        }
    }

    /// Unconsumed orders with their arena index, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a E)> + '_ {
        self.entries
            .iter()
            .zip(&self.consumed)
            .enumerate()
            .filter(|(_, (_, taken))| !**taken)
            .map(|(index, (order, _))| (index, *order))
    }

    /// Drain whatever is left.
    pub fn into_remaining(self) -> Vec<&'a E> {
        self.entries
            .into_iter()
            .zip(self.consumed)
            .filter(|(_, taken)| !taken)
            .map(|(order, _)| order)
            .collect()
    }
}
