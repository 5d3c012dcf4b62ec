//! Subcommands of the `sweeper` binary

pub mod config;
pub mod train;
