//! Common test utilities for the sweeper test suite.
//!
//! Provides a scripted simulation whose sweepers move exactly as a test
//! dictates, so controller behaviour can be asserted tick by tick.

#![allow(dead_code)]

use std::collections::VecDeque;

use sweeper::{
    Action, Contact, Error, GridExtent, Position, Result,
    ports::{EpisodeClock, Simulation, SweeperSnapshot},
};

/// What happens to one sweeper during one scripted tick.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub position: Position,
    pub contact: Contact,
    pub dies: bool,
}

impl Step {
    pub fn to(x: f64, y: f64) -> Self {
        Self {
            position: Position::new(x, y),
            contact: Contact::None,
            dies: false,
        }
    }

    pub fn touching(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }

    pub fn fatal(mut self) -> Self {
        self.dies = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedSweeper {
    pub position: Position,
    pub previous: Position,
    pub heading: Action,
    pub dead: bool,
    pub contact: Contact,
}

/// Simulation driven by a queue of per-tick steps.
///
/// A tick with no queued entry (or a `None` slot for a sweeper) leaves that
/// sweeper in place with no contact. Dead sweepers never move. When the tick
/// counter is at the episode length, `advance` starts a new episode instead:
/// the counter returns to zero and every sweeper is revived where it stands.
#[derive(Debug, Clone)]
pub struct ScriptedSimulation {
    pub extent: GridExtent,
    pub sweepers: Vec<ScriptedSweeper>,
    pub script: VecDeque<Vec<Option<Step>>>,
    pub tick: usize,
    pub length: usize,
    pub headings_set: Vec<(usize, usize, Action)>,
    pub advances: usize,
    pub finish_calls: usize,
}

impl ScriptedSimulation {
    /// Sweepers start at the given positions on a 100x100 world with 10-unit cells.
    pub fn new(starts: &[(f64, f64)], length: usize) -> Self {
        let sweepers = starts
            .iter()
            .map(|&(x, y)| ScriptedSweeper {
                position: Position::new(x, y),
                previous: Position::new(x, y),
                heading: Action::Right,
                dead: false,
                contact: Contact::None,
            })
            .collect();
        Self {
            extent: GridExtent::new(100, 100, 10),
            sweepers,
            script: VecDeque::new(),
            tick: 0,
            length,
            headings_set: Vec::new(),
            advances: 0,
            finish_calls: 0,
        }
    }

    pub fn push_tick(&mut self, steps: Vec<Option<Step>>) {
        self.script.push_back(steps);
    }

    /// Headings assigned to a sweeper during a given tick number (1-based advance).
    pub fn headings_for(&self, index: usize, advance: usize) -> Vec<Action> {
        self.headings_set
            .iter()
            .filter(|(a, i, _)| *a == advance && *i == index)
            .map(|(_, _, action)| *action)
            .collect()
    }
}

fn out_of_range(index: usize, population: usize) -> Error {
    Error::AgentOutOfRange { index, population }
}

impl Simulation for ScriptedSimulation {
    fn population(&self) -> usize {
        self.sweepers.len()
    }

    fn extent(&self) -> GridExtent {
        self.extent
    }

    fn sweeper(&self, index: usize) -> Result<SweeperSnapshot> {
        let sweeper = self
            .sweepers
            .get(index)
            .ok_or_else(|| out_of_range(index, self.sweepers.len()))?;
        Ok(SweeperSnapshot {
            position: sweeper.position,
            previous_position: sweeper.previous,
            heading: sweeper.heading,
            is_dead: sweeper.dead,
        })
    }

    fn set_heading(&mut self, index: usize, action: Action) -> Result<()> {
        let population = self.sweepers.len();
        let tick = self.advances + 1;
        let sweeper = self
            .sweepers
            .get_mut(index)
            .ok_or_else(|| out_of_range(index, population))?;
        sweeper.heading = action;
        self.headings_set.push((tick, index, action));
        Ok(())
    }

    fn contact(&self, index: usize) -> Result<Contact> {
        self.sweepers
            .get(index)
            .map(|sweeper| sweeper.contact)
            .ok_or_else(|| out_of_range(index, self.sweepers.len()))
    }

    fn clock(&self) -> EpisodeClock {
        EpisodeClock {
            tick: self.tick,
            length: self.length,
        }
    }

    fn finish_episode(&mut self) {
        self.finish_calls += 1;
        self.tick = self.length;
    }

    fn advance(&mut self) -> Result<()> {
        self.advances += 1;
        if self.tick >= self.length {
            self.tick = 0;
            for sweeper in &mut self.sweepers {
                sweeper.dead = false;
                sweeper.previous = sweeper.position;
                sweeper.contact = Contact::None;
            }
            return Ok(());
        }

        self.tick += 1;
        let steps = self.script.pop_front().unwrap_or_default();
        for (index, sweeper) in self.sweepers.iter_mut().enumerate() {
            if sweeper.dead {
                continue;
            }
            sweeper.previous = sweeper.position;
            match steps.get(index).copied().flatten() {
                Some(step) => {
                    sweeper.position = step.position;
                    sweeper.contact = step.contact;
                    sweeper.dead = step.dies;
                }
                None => sweeper.contact = Contact::None,
            }
        }
        Ok(())
    }
}
