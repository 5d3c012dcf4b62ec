//! Training sessions and the observers that watch them

pub mod observers;
pub mod training;

pub use observers::{EpisodeSummary, MetricsObserver, ProgressObserver};
pub use training::{TrainingResult, TrainingSession};
