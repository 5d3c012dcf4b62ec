//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing controller activity,
//! allowing composable data collection without coupling the update engine
//! to specific output formats or metrics.

use crate::{
    Result,
    q_learning::{EpisodeEnd, Transition},
    types::GridExtent,
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_session_start(population, extent)` - Once at the beginning
/// 2. For each tick:
///    - `on_transition(...)` - For each value update applied in that tick
///    - `on_episode_end(...)` - When the tick crossed an episode boundary
/// 3. `on_session_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use sweeper::{ports::Observer, q_learning::EpisodeEnd};
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(&mut self, _end: &EpisodeEnd) -> sweeper::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called once before the first tick.
    fn on_session_start(&mut self, _population: usize, _extent: GridExtent) -> Result<()> {
        Ok(())
    }

    /// Called for every value update, terminal or not.
    fn on_transition(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode finishes, either by running out of ticks or
    /// because every sweeper died.
    fn on_episode_end(&mut self, _end: &EpisodeEnd) -> Result<()> {
        Ok(())
    }

    /// Called once after the last tick.
    fn on_session_end(&mut self) -> Result<()> {
        Ok(())
    }
}
