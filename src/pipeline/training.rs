//! Training session driving a controller against a simulation

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    Result,
    ports::{Observer, Simulation},
    q_learning::QLearningController,
};

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes finished during the run
    pub episodes: usize,
    /// Controller updates performed
    pub ticks: usize,
    /// Value updates applied
    pub updates: usize,
    /// Terminal (post-death) updates applied
    pub terminal_updates: usize,
    /// Sum of all rewards observed
    pub total_reward: f64,
    /// Whether the run stopped on the tick cap rather than the episode budget
    pub hit_tick_cap: bool,
}

impl TrainingResult {
    pub fn mean_reward_per_episode(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Runs controller updates until the controller asks to stop
#[derive(Default)]
pub struct TrainingSession {
    max_ticks: Option<usize>,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after this many ticks even if episodes remain
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Add an observer to the session
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Train until the controller's episode budget is spent or the tick cap
    /// is reached. The controller is initialized first if needed and is left
    /// initialized afterwards so its table can be inspected.
    pub fn run<S: Simulation + ?Sized>(
        &mut self,
        controller: &mut QLearningController,
        simulation: &mut S,
    ) -> Result<TrainingResult> {
        if !controller.is_initialized() {
            controller.initialize(simulation)?;
        }

        let population = simulation.population();
        let extent = simulation.extent();
        for observer in &mut self.observers {
            observer.on_session_start(population, extent)?;
        }

        let mut result = TrainingResult {
            episodes: 0,
            ticks: 0,
            updates: 0,
            terminal_updates: 0,
            total_reward: 0.0,
            hit_tick_cap: false,
        };

        // Observers are closed even when a tick fails.
        let outcome = self.drive(controller, simulation, &mut result);
        let closed = self
            .observers
            .iter_mut()
            .try_for_each(|observer| observer.on_session_end());
        if let Err(err) = &outcome {
            warn!(ticks = result.ticks, error = %err, "training session aborted");
        }
        outcome?;
        closed?;

        info!(
            episodes = result.episodes,
            ticks = result.ticks,
            total_reward = result.total_reward,
            "training session finished"
        );
        Ok(result)
    }

    fn drive<S: Simulation + ?Sized>(
        &mut self,
        controller: &mut QLearningController,
        simulation: &mut S,
        result: &mut TrainingResult,
    ) -> Result<()> {
        loop {
            let report = controller.update(simulation)?;
            result.ticks += 1;

            for transition in &report.transitions {
                result.updates += 1;
                result.total_reward += transition.reward;
                if transition.terminal {
                    result.terminal_updates += 1;
                }
                for observer in &mut self.observers {
                    observer.on_transition(transition)?;
                }
            }

            if let Some(end) = &report.episode_end {
                result.episodes += 1;
                for observer in &mut self.observers {
                    observer.on_episode_end(end)?;
                }
            }

            if !report.keep_running {
                return Ok(());
            }
            if self.max_ticks.is_some_and(|cap| result.ticks >= cap) {
                result.hit_tick_cap = true;
                return Ok(());
            }
        }
    }
}
