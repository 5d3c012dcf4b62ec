//! Shared-table Q-learning
//!
//! Q-learning is off-policy TD control: every update bootstraps from the best
//! known value at the successor cell, whatever action is taken next.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`ValueTable`] | (cell, action) → value, one table for the whole population |
//! | [`select_action`] | greedy choice, uniform among exact ties |
//! | [`QLearningController`] | per-tick action phase, simulation step, learning phase |
//!
//! ## Usage Example
//!
//! ```no_run
//! use sweeper::{
//!     ControllerConfig, MineField, MineFieldConfig,
//!     q_learning::QLearningController,
//! };
//!
//! let mut field = MineField::new(MineFieldConfig::default())?;
//! let mut controller = QLearningController::new(ControllerConfig::default().with_seed(7))?;
//! controller.initialize(&field)?;
//! while controller.update(&mut field)?.keep_running {
//!     # break;
//! }
//! controller.teardown();
//! # Ok::<(), sweeper::Error>(())
//! ```

pub mod controller;
pub mod q_table;
pub mod selector;

pub use controller::{EpisodeEnd, QLearningController, TickReport, Transition};
pub use q_table::{ScoreRow, ValueTable};
pub use selector::{expected_reward, select_action};
