//! Per-agent terminal update bookkeeping
//!
//! A dead sweeper keeps reporting its death flag until the episode restarts.
//! The tracker makes sure only the first of those observations produces a
//! value update.

use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct LifecycleTracker {
    confirmed: Vec<bool>,
}

impl LifecycleTracker {
    pub fn new(population: usize) -> Self {
        Self {
            confirmed: vec![false; population],
        }
    }

    /// Clear every flag and resize to `population`.
    pub fn reset(&mut self, population: usize) {
        self.confirmed.clear();
        self.confirmed.resize(population, false);
    }

    /// Returns true exactly once per death: the first time `is_dead` is seen
    /// for an agent that has not been flagged yet.
    pub fn mark_if_newly_dead(&mut self, index: usize, is_dead: bool) -> Result<bool> {
        let population = self.confirmed.len();
        let flag = self
            .confirmed
            .get_mut(index)
            .ok_or(Error::AgentOutOfRange { index, population })?;
        if is_dead && !*flag {
            *flag = true;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whether the terminal update for `index` has already been applied.
    pub fn is_confirmed(&self, index: usize) -> bool {
        self.confirmed.get(index).copied().unwrap_or(false)
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed.iter().filter(|&&flag| flag).count()
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}
