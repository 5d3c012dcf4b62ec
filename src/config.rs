//! Controller configuration

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, reward::RewardSchedule, types::BoundsPolicy};

/// Configuration for a [`crate::q_learning::QLearningController`].
///
/// # Examples
///
/// ```
/// use sweeper::{BoundsPolicy, ControllerConfig};
///
/// let config = ControllerConfig::default()
///     .with_seed(42)
///     .with_bounds(BoundsPolicy::Reject)
///     .with_max_episodes(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_rate: f64,
    /// Reward per contact kind
    pub rewards: RewardSchedule,
    /// Handling of positions that discretize outside the grid
    pub bounds: BoundsPolicy,
    /// Random seed for tie-breaking
    pub seed: Option<u64>,
    /// Stop after this many finished episodes; `None` runs indefinitely
    pub max_episodes: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_rate: 0.8,
            rewards: RewardSchedule::default(),
            bounds: BoundsPolicy::default(),
            seed: None,
            max_episodes: None,
        }
    }
}

impl ControllerConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_rate(mut self, discount_rate: f64) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the random seed for deterministic tie-breaking.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_episodes(mut self, episodes: usize) -> Self {
        self.max_episodes = Some(episodes);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(Error::invalid_config(format!(
                "discount_rate must be in [0, 1], got {}",
                self.discount_rate
            )));
        }
        if self.max_episodes == Some(0) {
            return Err(Error::invalid_config("max_episodes must be at least 1"));
        }
        self.rewards.validate()
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
