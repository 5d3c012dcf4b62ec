//! Observer adapters for training sessions
//!
//! Observers allow composable data collection during training without coupling
//! the controller to specific output formats.

use std::{
    fs::File,
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{EpisodeEnd, Transition},
    reward::Contact,
    types::GridExtent,
};

/// Progress bar observer - Shows episodes completed
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_episodes: Option<u64>,
    episode_reward: f64,
    last_reward: f64,
}

impl ProgressObserver {
    /// Create a progress observer. Without a total a spinner is shown.
    pub fn new(total_episodes: Option<usize>) -> Self {
        Self {
            progress_bar: None,
            total_episodes: total_episodes.map(|total| total as u64),
            episode_reward: 0.0,
            last_reward: 0.0,
        }
    }
}

impl Observer for ProgressObserver {
    fn on_session_start(&mut self, _population: usize, _extent: GridExtent) -> Result<()> {
        let pb = match self.total_episodes {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})",
                        )
                        .map_err(|e| Error::ProgressBarTemplate {
                            message: e.to_string(),
                        })?
                        .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {pos} episodes ({msg})")
                        .map_err(|e| Error::ProgressBarTemplate {
                            message: e.to_string(),
                        })?,
                );
                pb
            }
        };
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_transition(&mut self, transition: &Transition) -> Result<()> {
        self.episode_reward += transition.reward;
        Ok(())
    }

    fn on_episode_end(&mut self, end: &EpisodeEnd) -> Result<()> {
        self.last_reward = self.episode_reward;
        self.episode_reward = 0.0;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(end.episode as u64);
            pb.set_message(format!("reward {:.1}", self.last_reward));
        }
        Ok(())
    }

    fn on_session_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("reward {:.1}", self.last_reward));
        }
        Ok(())
    }
}

/// Per-episode training metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub ticks: usize,
    pub ended_early: bool,
    pub mines_collected: usize,
    pub rocks_hit: usize,
    pub super_mines_hit: usize,
    pub deaths: usize,
    pub total_reward: f64,
}

/// Metrics observer - Tracks per-episode summaries
///
/// Clones share the recorded episodes, so a clone kept by the caller can read
/// what the boxed copy inside a session collected.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    episodes: Arc<Mutex<Vec<EpisodeSummary>>>,
    current: EpisodeSummary,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries of all finished episodes
    pub fn episodes(&self) -> Vec<EpisodeSummary> {
        self.episodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mean total reward over the last `window` episodes
    pub fn mean_reward(&self, window: usize) -> f64 {
        let episodes = self.episodes.lock().unwrap_or_else(PoisonError::into_inner);
        let recent: Vec<f64> = episodes
            .iter()
            .rev()
            .take(window)
            .map(|summary| summary.total_reward)
            .collect();
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        }
    }

    /// Save all summaries to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &self.episodes())?;
        Ok(())
    }
}

impl Observer for MetricsObserver {
    fn on_transition(&mut self, transition: &Transition) -> Result<()> {
        match transition.contact {
            Contact::Mine { consumed: false } => self.current.mines_collected += 1,
            Contact::Rock => self.current.rocks_hit += 1,
            Contact::SuperMine => self.current.super_mines_hit += 1,
            Contact::None | Contact::Mine { consumed: true } => {}
        }
        if transition.terminal {
            self.current.deaths += 1;
        }
        self.current.total_reward += transition.reward;
        Ok(())
    }

    fn on_episode_end(&mut self, end: &EpisodeEnd) -> Result<()> {
        let mut summary = std::mem::take(&mut self.current);
        summary.episode = end.episode;
        summary.ticks = end.ticks;
        summary.ended_early = end.ended_early;
        self.episodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary);
        Ok(())
    }
}
