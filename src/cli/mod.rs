//! CLI infrastructure for the sweeper binary

pub mod commands;
pub mod output;
