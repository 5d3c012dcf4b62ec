//! Simulation port - the world the controller steers
//!
//! The controller never moves sweepers or resolves collisions itself. It reads
//! agent state through this trait, hands back headings, and asks the
//! simulation to advance one tick at a fixed point in its update sequence.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    reward::Contact,
    types::{Action, GridExtent, Position},
};

/// State of one sweeper as reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweeperSnapshot {
    /// Position after the most recent tick
    pub position: Position,
    /// Position before the most recent tick
    pub previous_position: Position,
    /// Heading the sweeper moved in, i.e. the last action taken
    pub heading: Action,
    pub is_dead: bool,
}

/// Tick counter of the running episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeClock {
    pub tick: usize,
    /// Tick count at which the episode is over
    pub length: usize,
}

impl EpisodeClock {
    pub fn is_at_limit(&self) -> bool {
        self.tick == self.length
    }
}

/// Simulation trait - external collaborator driven by the controller
///
/// # Event Sequence
///
/// Within one controller update the methods are called in this order:
/// 1. `population`, `sweeper`, `clock` - to detect global death
/// 2. `finish_episode` - only when every sweeper is dead
/// 3. `sweeper` + `set_heading` - for each living sweeper
/// 4. `advance` - exactly once
/// 5. `sweeper` + `contact` - for each sweeper still owed an update
/// 6. `clock` - to detect the episode boundary
pub trait Simulation {
    /// Number of sweepers. Fixed for the lifetime of the simulation.
    fn population(&self) -> usize;

    /// World size and discretization cell size.
    fn extent(&self) -> GridExtent;

    /// Current state of a sweeper.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AgentOutOfRange`] for an unknown index.
    fn sweeper(&self, index: usize) -> Result<SweeperSnapshot>;

    /// Set the direction a sweeper moves in on the next tick.
    fn set_heading(&mut self, index: usize, action: Action) -> Result<()>;

    /// What the sweeper overlaps after its latest move, if anything.
    fn contact(&self, index: usize) -> Result<Contact>;

    fn clock(&self) -> EpisodeClock;

    /// Force the tick counter to the episode limit.
    fn finish_episode(&mut self);

    /// Advance movement, collisions and deaths by one tick.
    fn advance(&mut self) -> Result<()>;
}
