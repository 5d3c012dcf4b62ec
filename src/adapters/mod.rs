//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits defined in the ports module.
//! Adapters depend on the ports, never the other way around.

pub mod minefield;

pub use minefield::{MineField, MineFieldConfig};
