//! Immediate reward model
//!
//! Scores what a sweeper's move brought it into contact with. The model is a
//! pure function of the contact; consuming mines is left to the simulation.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What a sweeper overlaps after moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Contact {
    #[default]
    None,
    /// Permanent obstacle.
    Rock,
    /// Collectable mine. `consumed` is true when an earlier step already took it.
    Mine { consumed: bool },
    /// Lethal hazard.
    SuperMine,
}

/// Reward assigned to each kind of contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSchedule {
    pub no_contact: f64,
    pub rock: f64,
    pub mine: f64,
    pub consumed_mine: f64,
    pub super_mine: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            no_contact: 0.0,
            rock: -5.0,
            mine: 50.0,
            consumed_mine: 0.0,
            super_mine: -50.0,
        }
    }
}

impl RewardSchedule {
    /// Reward for a single contact.
    pub fn reward(&self, contact: &Contact) -> f64 {
        match contact {
            Contact::None => self.no_contact,
            Contact::Rock => self.rock,
            Contact::Mine { consumed: false } => self.mine,
            Contact::Mine { consumed: true } => self.consumed_mine,
            Contact::SuperMine => self.super_mine,
        }
    }

    /// Every reward must be finite or the value table would be poisoned.
    pub fn validate(&self) -> Result<()> {
        let entries = [
            ("no_contact", self.no_contact),
            ("rock", self.rock),
            ("mine", self.mine),
            ("consumed_mine", self.consumed_mine),
            ("super_mine", self.super_mine),
        ];
        for (name, value) in entries {
            if !value.is_finite() {
                return Err(Error::invalid_config(format!(
                    "reward '{name}' must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
