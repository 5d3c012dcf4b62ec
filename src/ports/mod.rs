//! Ports (trait boundaries) for external collaborators.
//!
//! The controller owns these interfaces; the simulation it steers and the
//! observers that watch it are adapters implemented elsewhere.

pub mod observer;
pub mod simulation;

pub use observer::Observer;
pub use simulation::{EpisodeClock, Simulation, SweeperSnapshot};
