//! Reference minefield simulation.
//!
//! A deliberately plain implementation of the [`Simulation`] port: sweepers
//! step one cell per tick in their heading, rocks block, fresh mines are
//! collected, and super-mines kill. It exists so the controller can be
//! trained and tested end-to-end without a physics engine.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeClock, Simulation, SweeperSnapshot},
    reward::Contact,
    types::{Action, GridCell, GridExtent, Position},
};

/// Configuration for a [`MineField`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MineFieldConfig {
    pub world_width: u32,
    pub world_height: u32,
    pub cell_size: u32,
    pub sweepers: usize,
    pub mines: usize,
    pub super_mines: usize,
    pub rocks: usize,
    /// Ticks per episode
    pub episode_length: usize,
    pub seed: Option<u64>,
}

impl Default for MineFieldConfig {
    fn default() -> Self {
        Self {
            world_width: 400,
            world_height: 400,
            cell_size: 10,
            sweepers: 20,
            mines: 40,
            super_mines: 10,
            rocks: 20,
            episode_length: 2000,
            seed: None,
        }
    }
}

impl MineFieldConfig {
    pub fn extent(&self) -> GridExtent {
        GridExtent::new(self.world_width, self.world_height, self.cell_size)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(Error::invalid_config("cell_size must be positive"));
        }
        if self.sweepers == 0 {
            return Err(Error::invalid_config("at least one sweeper is required"));
        }
        if self.episode_length == 0 {
            return Err(Error::invalid_config("episode_length must be positive"));
        }
        let extent = self.extent();
        let cells = extent.columns() * extent.rows();
        let objects = self.mines + self.super_mines + self.rocks;
        if objects >= cells {
            return Err(Error::invalid_config(format!(
                "{objects} objects leave no free cell on a {}x{} grid",
                extent.columns(),
                extent.rows()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Sweeper {
    cell: GridCell,
    previous: GridCell,
    heading: Action,
    dead: bool,
    contact: Contact,
}

/// In-memory minefield implementing [`Simulation`].
#[derive(Debug, Clone)]
pub struct MineField {
    config: MineFieldConfig,
    extent: GridExtent,
    /// Object occupying each cell, column-major
    objects: Vec<Contact>,
    sweepers: Vec<Sweeper>,
    tick: usize,
    rng: StdRng,
}

impl MineField {
    /// Scatter objects over distinct cells and spawn the sweepers.
    pub fn new(config: MineFieldConfig) -> Result<Self> {
        config.validate()?;
        let extent = config.extent();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut offsets: Vec<usize> = (0..extent.columns() * extent.rows()).collect();
        offsets.shuffle(&mut rng);
        let mut objects = vec![Contact::None; offsets.len()];
        let kinds = std::iter::repeat_n(Contact::Mine { consumed: false }, config.mines)
            .chain(std::iter::repeat_n(Contact::SuperMine, config.super_mines))
            .chain(std::iter::repeat_n(Contact::Rock, config.rocks));
        for (offset, kind) in offsets.into_iter().zip(kinds) {
            objects[offset] = kind;
        }

        let mut field = Self {
            config,
            extent,
            objects,
            sweepers: Vec::new(),
            tick: 0,
            rng,
        };
        field.start_episode();
        Ok(field)
    }

    pub fn config(&self) -> &MineFieldConfig {
        &self.config
    }

    fn offset(&self, cell: GridCell) -> usize {
        cell.x as usize * self.extent.rows() + cell.y as usize
    }

    fn cell_at(&self, offset: usize) -> GridCell {
        let rows = self.extent.rows();
        GridCell::new((offset / rows) as i64, (offset % rows) as i64)
    }

    fn center_of(&self, cell: GridCell) -> Position {
        let half = f64::from(self.extent.cell_size) / 2.0;
        let origin = self.extent.origin_of(cell);
        Position::new(origin.x + half, origin.y + half)
    }

    /// Object in a cell, `Contact::None` when empty or off-grid.
    pub fn object_at(&self, cell: GridCell) -> Contact {
        if self.extent.contains(cell) {
            self.objects[self.offset(cell)]
        } else {
            Contact::None
        }
    }

    /// Place a specific object, replacing whatever was there.
    pub fn place(&mut self, cell: GridCell, object: Contact) -> Result<()> {
        if !self.extent.contains(cell) {
            return Err(Error::CellOutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.extent.columns(),
                height: self.extent.rows(),
            });
        }
        let offset = self.offset(cell);
        self.objects[offset] = object;
        Ok(())
    }

    /// Move a sweeper to a cell without advancing time.
    pub fn teleport(&mut self, index: usize, cell: GridCell) -> Result<()> {
        let population = self.sweepers.len();
        let sweeper = self
            .sweepers
            .get_mut(index)
            .ok_or(Error::AgentOutOfRange { index, population })?;
        sweeper.cell = cell;
        sweeper.previous = cell;
        Ok(())
    }

    pub fn mines_remaining(&self) -> usize {
        self.objects
            .iter()
            .filter(|object| matches!(object, Contact::Mine { consumed: false }))
            .count()
    }

    pub fn sweepers_alive(&self) -> usize {
        self.sweepers.iter().filter(|sweeper| !sweeper.dead).count()
    }

    fn start_episode(&mut self) {
        for object in &mut self.objects {
            if let Contact::Mine { consumed } = object {
                *consumed = false;
            }
        }

        let free: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| **object == Contact::None)
            .map(|(offset, _)| offset)
            .collect();
        let spawns: Vec<usize> = (0..self.config.sweepers)
            .map(|_| free[self.rng.random_range(0..free.len())])
            .collect();
        let sweepers: Vec<Sweeper> = spawns
            .into_iter()
            .map(|offset| self.cell_at(offset))
            .map(|cell| Sweeper {
                cell,
                previous: cell,
                heading: Action::Right,
                dead: false,
                contact: Contact::None,
            })
            .collect();
        self.sweepers = sweepers;
        self.tick = 0;
    }

    fn step(&mut self, index: usize) {
        let sweeper = &self.sweepers[index];
        if sweeper.dead {
            return;
        }
        let (dx, dy) = sweeper.heading.delta();
        let current = sweeper.cell;
        let target = self
            .extent
            .clamp(GridCell::new(current.x + dx, current.y + dy));
        let target_offset = self.offset(target);
        let object = self.objects[target_offset];

        let (cell, dead) = match object {
            Contact::Rock => (current, false),
            Contact::Mine { consumed: false } => {
                self.objects[target_offset] = Contact::Mine { consumed: true };
                (target, false)
            }
            Contact::SuperMine => (target, true),
            Contact::None | Contact::Mine { consumed: true } => (target, false),
        };

        let sweeper = &mut self.sweepers[index];
        sweeper.previous = current;
        sweeper.cell = cell;
        sweeper.dead = dead;
        sweeper.contact = object;
    }

    fn sweeper_ref(&self, index: usize) -> Result<&Sweeper> {
        self.sweepers.get(index).ok_or(Error::AgentOutOfRange {
            index,
            population: self.sweepers.len(),
        })
    }
}

impl Simulation for MineField {
    fn population(&self) -> usize {
        self.sweepers.len()
    }

    fn extent(&self) -> GridExtent {
        self.extent
    }

    fn sweeper(&self, index: usize) -> Result<SweeperSnapshot> {
        let sweeper = self.sweeper_ref(index)?;
        Ok(SweeperSnapshot {
            position: self.center_of(sweeper.cell),
            previous_position: self.center_of(sweeper.previous),
            heading: sweeper.heading,
            is_dead: sweeper.dead,
        })
    }

    fn set_heading(&mut self, index: usize, action: Action) -> Result<()> {
        let population = self.sweepers.len();
        let sweeper = self
            .sweepers
            .get_mut(index)
            .ok_or(Error::AgentOutOfRange { index, population })?;
        sweeper.heading = action;
        Ok(())
    }

    fn contact(&self, index: usize) -> Result<Contact> {
        Ok(self.sweeper_ref(index)?.contact)
    }

    fn clock(&self) -> EpisodeClock {
        EpisodeClock {
            tick: self.tick,
            length: self.config.episode_length,
        }
    }

    fn finish_episode(&mut self) {
        self.tick = self.config.episode_length;
    }

    fn advance(&mut self) -> Result<()> {
        if self.tick >= self.config.episode_length {
            self.start_episode();
            return Ok(());
        }
        self.tick += 1;
        for index in 0..self.sweepers.len() {
            self.step(index);
        }
        Ok(())
    }
}
