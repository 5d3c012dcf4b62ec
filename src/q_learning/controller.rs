//! Per-tick update engine
//!
//! Drives a whole population of sweepers from one shared [`ValueTable`].
//! Each call to [`QLearningController::update`] runs, in order:
//!
//! 1. global-death check (ends the episode early when every sweeper is dead)
//! 2. action phase (greedy heading for every living sweeper)
//! 3. one [`Simulation::advance`]
//! 4. learning phase (one Q-learning update per sweeper, at most one after death)
//! 5. episode boundary check

use std::collections::VecDeque;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    config::ControllerConfig,
    lifecycle::LifecycleTracker,
    ports::{EpisodeClock, Simulation},
    q_learning::{q_table::ValueTable, selector::select_action},
    reward::Contact,
    types::{Action, BoundsPolicy, GridCell, GridExtent, Position},
};

/// One value update applied during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub agent: usize,
    pub from: GridCell,
    pub action: Action,
    pub to: GridCell,
    pub contact: Contact,
    pub reward: f64,
    pub value_before: f64,
    pub value_after: f64,
    /// True for the single update applied when the sweeper is first seen dead
    pub terminal: bool,
}

/// Marker for a finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEnd {
    /// 1-based count of finished episodes
    pub episode: usize,
    /// Ticks the episode ran for
    pub ticks: usize,
    /// True when every sweeper died before the tick limit
    pub ended_early: bool,
}

/// Outcome of one controller update.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Simulation clock after the tick
    pub clock: EpisodeClock,
    pub transitions: Vec<Transition>,
    pub episode_end: Option<EpisodeEnd>,
    /// False once the configured episode budget is spent
    pub keep_running: bool,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// State that only exists between `initialize` and `teardown`.
#[derive(Debug, Clone)]
struct Session {
    table: ValueTable,
    lifecycle: LifecycleTracker,
    extent: GridExtent,
    population: usize,
    /// Finished episodes not yet handed out in a [`TickReport`]
    undelivered: VecDeque<EpisodeEnd>,
}

/// A learning-phase update whose cells and reward are already resolved.
#[derive(Debug, Clone, Copy)]
struct PendingUpdate {
    agent: usize,
    from: GridCell,
    action: Action,
    to: GridCell,
    contact: Contact,
    reward: f64,
    is_dead: bool,
}

impl Session {
    /// Resolve every sweeper that is due an update without mutating anything.
    fn plan_learning<S: Simulation + ?Sized>(
        &self,
        simulation: &S,
        config: &ControllerConfig,
    ) -> Result<Vec<PendingUpdate>> {
        let mut planned = Vec::with_capacity(self.population);
        for agent in 0..self.population {
            let sweeper = simulation.sweeper(agent)?;
            if sweeper.is_dead && self.lifecycle.is_confirmed(agent) {
                continue;
            }
            let to = locate(&self.extent, config.bounds, agent, sweeper.position)?;
            let from = locate(&self.extent, config.bounds, agent, sweeper.previous_position)?;
            let contact = simulation.contact(agent)?;
            planned.push(PendingUpdate {
                agent,
                from,
                action: sweeper.heading,
                to,
                contact,
                reward: config.rewards.reward(&contact),
                is_dead: sweeper.is_dead,
            });
        }
        Ok(planned)
    }

    /// Flag new deaths and write the table, in agent order.
    fn apply_learning(&mut self, planned: Vec<PendingUpdate>) -> Result<Vec<Transition>> {
        planned
            .into_iter()
            .map(|update| {
                let terminal = self.lifecycle.mark_if_newly_dead(update.agent, update.is_dead)?;
                let (value_before, value_after) = self.table.q_learning_update(
                    update.from,
                    update.action,
                    update.reward,
                    update.to,
                )?;
                Ok(Transition {
                    agent: update.agent,
                    from: update.from,
                    action: update.action,
                    to: update.to,
                    contact: update.contact,
                    reward: update.reward,
                    value_before,
                    value_after,
                    terminal,
                })
            })
            .collect()
    }
}

/// Discretize a position, applying the bounds policy to off-grid cells.
fn locate(
    extent: &GridExtent,
    bounds: BoundsPolicy,
    agent: usize,
    position: Position,
) -> Result<GridCell> {
    let cell = extent.cell_of(position);
    if extent.contains(cell) {
        return Ok(cell);
    }
    match bounds {
        BoundsPolicy::Clamp => {
            let clamped = extent.clamp(cell);
            warn!(agent, %cell, %clamped, "position outside grid, clamping");
            Ok(clamped)
        }
        BoundsPolicy::Reject => Err(Error::CellOutOfBounds {
            x: cell.x,
            y: cell.y,
            width: extent.columns(),
            height: extent.rows(),
        }),
    }
}

/// Tabular Q-learning controller with one table shared by all sweepers.
#[derive(Debug, Clone)]
pub struct QLearningController {
    config: ControllerConfig,
    session: Option<Session>,
    rng: StdRng,
    episodes: usize,
}

impl QLearningController {
    /// Create a controller. The table is allocated by [`Self::initialize`].
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: build_rng(config.seed),
            config,
            session: None,
            episodes: 0,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The shared table, if initialized.
    pub fn table(&self) -> Option<&ValueTable> {
        self.session.as_ref().map(|session| &session.table)
    }

    pub fn table_mut(&mut self) -> Option<&mut ValueTable> {
        self.session.as_mut().map(|session| &mut session.table)
    }

    pub fn lifecycle(&self) -> Option<&LifecycleTracker> {
        self.session.as_ref().map(|session| &session.lifecycle)
    }

    /// Number of episodes finished since initialization.
    pub fn episodes_completed(&self) -> usize {
        self.episodes
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Allocate a zeroed table sized to the simulation's grid and clear all
    /// lifecycle flags. Calling it again starts learning from scratch.
    pub fn initialize<S: Simulation + ?Sized>(&mut self, simulation: &S) -> Result<()> {
        let extent = simulation.extent();
        let population = simulation.population();
        if extent.cell_size == 0 {
            return Err(Error::invalid_config("grid cell size must be positive"));
        }
        if population == 0 {
            return Err(Error::invalid_config(
                "population must contain at least one sweeper",
            ));
        }

        let table = ValueTable::new(
            extent.columns(),
            extent.rows(),
            self.config.learning_rate,
            self.config.discount_rate,
        );
        info!(
            columns = table.columns(),
            rows = table.rows(),
            population,
            learning_rate = self.config.learning_rate,
            discount_rate = self.config.discount_rate,
            "initialized shared value table"
        );
        self.session = Some(Session {
            table,
            lifecycle: LifecycleTracker::new(population),
            extent,
            population,
            undelivered: VecDeque::new(),
        });
        self.episodes = 0;
        self.rng = build_rng(self.config.seed);
        Ok(())
    }

    /// Run one tick. See the module docs for the phase order.
    ///
    /// # Errors
    ///
    /// - [`Error::NotInitialized`] before [`Self::initialize`]
    /// - [`Error::PopulationMismatch`] if the simulation's population changed
    /// - [`Error::CellOutOfBounds`] under [`BoundsPolicy::Reject`]
    /// - any error reported by the simulation
    ///
    /// A failed tick applies no value updates and sets no lifecycle flags.
    /// An episode that finished during a failed tick is still counted and is
    /// reported by the next successful one.
    pub fn update<S: Simulation + ?Sized>(&mut self, simulation: &mut S) -> Result<TickReport> {
        let Self {
            config,
            session,
            rng,
            episodes,
        } = self;
        let session = session.as_mut().ok_or_else(|| Error::NotInitialized {
            operation: "update".to_string(),
        })?;
        let population = simulation.population();
        if population != session.population {
            return Err(Error::PopulationMismatch {
                expected: session.population,
                actual: population,
            });
        }
        let extent = session.extent;
        let bounds = config.bounds;
        let mut ended_early = false;

        let mut all_dead = true;
        for index in 0..population {
            if !simulation.sweeper(index)?.is_dead {
                all_dead = false;
                break;
            }
        }
        if all_dead {
            let clock = simulation.clock();
            // Already at the limit means the boundary was counted last tick.
            if !clock.is_at_limit() {
                *episodes += 1;
                ended_early = true;
                session.undelivered.push_back(EpisodeEnd {
                    episode: *episodes,
                    ticks: clock.tick,
                    ended_early: true,
                });
                debug!(
                    episode = *episodes,
                    tick = clock.tick,
                    "all sweepers dead, ending episode early"
                );
            }
            simulation.finish_episode();
            session.lifecycle.reset(population);
        }

        for index in 0..population {
            let sweeper = simulation.sweeper(index)?;
            if sweeper.is_dead {
                continue;
            }
            let cell = locate(&extent, bounds, index, sweeper.position)?;
            let action = select_action(session.table.get(cell)?, &mut *rng);
            simulation.set_heading(index, action)?;
        }

        simulation.advance()?;

        // Either every update of this tick is applied or none is.
        let learned = session
            .plan_learning(&*simulation, config)
            .and_then(|planned| session.apply_learning(planned));

        // The simulation has advanced, so the boundary is booked even when
        // learning failed.
        let clock = simulation.clock();
        if clock.is_at_limit() {
            session.lifecycle.reset(population);
            if !ended_early {
                *episodes += 1;
                session.undelivered.push_back(EpisodeEnd {
                    episode: *episodes,
                    ticks: clock.length,
                    ended_early: false,
                });
                debug!(episode = *episodes, ticks = clock.length, "episode reached tick limit");
            }
        }

        let transitions = learned?;
        let episode_end = session.undelivered.pop_front();

        let keep_running = config.max_episodes.is_none_or(|max| *episodes < max);
        Ok(TickReport {
            clock,
            transitions,
            episode_end,
            keep_running,
        })
    }

    /// Release the table. Nothing is persisted.
    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                episodes = self.episodes,
                cells = session.table.size(),
                "controller torn down"
            );
        }
    }
}
