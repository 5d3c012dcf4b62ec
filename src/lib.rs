//! Shared-table Q-learning controller for minesweeper agents
//!
//! This crate provides:
//! - A dense Q-table over a discretized 2-D grid, shared by every sweeper
//! - Greedy action selection with uniform tie-breaking
//! - A per-tick update engine that drives an external simulation
//! - A reference in-memory minefield, observers, and a training session runner

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod types;

pub use adapters::{MineField, MineFieldConfig};
pub use config::ControllerConfig;
pub use error::{Error, Result};
pub use lifecycle::LifecycleTracker;
pub use q_learning::{QLearningController, TickReport, Transition, ValueTable};
pub use reward::{Contact, RewardSchedule};
pub use types::{Action, BoundsPolicy, GridCell, GridExtent, Position};
