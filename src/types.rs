//! Core grid types shared by the controller and its collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of movement actions available to a sweeper.
pub const ACTION_COUNT: usize = 4;

/// One of the four discrete movement directions.
///
/// The discriminant is the action's column in the value table, so the order
/// (right, up, left, down) is part of the table layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Action {
    /// All actions in table order.
    pub const ALL: [Action; ACTION_COUNT] = [Action::Right, Action::Up, Action::Left, Action::Down];

    /// Column index of this action in a score row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Action for a column index, if the index is in `0..4`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Unit step on the grid. `Up` increases `y`.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Action::Right => (1, 0),
            Action::Up => (0, 1),
            Action::Left => (-1, 0),
            Action::Down => (0, -1),
        }
    }

    /// Single-character arrow used when printing a learned policy.
    pub fn arrow(self) -> char {
        match self {
            Action::Right => '>',
            Action::Up => '^',
            Action::Left => '<',
            Action::Down => 'v',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Up => "up",
            Action::Left => "left",
            Action::Down => "down",
        };
        f.write_str(name)
    }
}

/// Continuous position of an agent in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Discretized grid coordinate.
///
/// Signed so that positions that momentarily leave the playfield still map to
/// a representable (if out-of-range) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
}

impl GridCell {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Size of the simulated world and the cell size used to discretize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub world_width: u32,
    pub world_height: u32,
    pub cell_size: u32,
}

impl GridExtent {
    pub fn new(world_width: u32, world_height: u32, cell_size: u32) -> Self {
        Self {
            world_width,
            world_height,
            cell_size,
        }
    }

    /// Number of grid columns.
    ///
    /// One extra column covers positions lying exactly on the far edge.
    pub fn columns(&self) -> usize {
        (self.world_width / self.cell_size.max(1)) as usize + 1
    }

    /// Number of grid rows.
    pub fn rows(&self) -> usize {
        (self.world_height / self.cell_size.max(1)) as usize + 1
    }

    /// Discretize a position. The result may lie outside the grid.
    pub fn cell_of(&self, position: Position) -> GridCell {
        let size = f64::from(self.cell_size.max(1));
        GridCell::new(
            (position.x / size).floor() as i64,
            (position.y / size).floor() as i64,
        )
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.columns()
            && (cell.y as usize) < self.rows()
    }

    /// Nearest in-range cell.
    pub fn clamp(&self, cell: GridCell) -> GridCell {
        GridCell::new(
            cell.x.clamp(0, self.columns() as i64 - 1),
            cell.y.clamp(0, self.rows() as i64 - 1),
        )
    }

    /// World-space position of a cell's lower-left corner.
    pub fn origin_of(&self, cell: GridCell) -> Position {
        let size = f64::from(self.cell_size);
        Position::new(cell.x as f64 * size, cell.y as f64 * size)
    }
}

/// How the controller treats a position whose cell falls outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Snap to the nearest edge cell and log a warning.
    #[default]
    Clamp,
    /// Fail the tick with [`crate::Error::CellOutOfBounds`].
    Reject,
}
