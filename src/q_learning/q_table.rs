//! Shared Q-table over grid cells

use crate::{
    Error, Result,
    types::{ACTION_COUNT, Action, GridCell},
};

/// One score per action, in [`Action::ALL`] order.
pub type ScoreRow = [f64; ACTION_COUNT];

/// Dense Q-table mapping (cell, action) pairs to Q-values
///
/// Every sweeper reads and writes the same table, so experience gathered by
/// any one of them shapes the policy of all.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    /// Scores stored column-major: index = x * rows + y
    scores: Vec<ScoreRow>,
    columns: usize,
    rows: usize,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_rate: f64,
}

impl ValueTable {
    /// Create a `columns x rows` table with every score at zero.
    pub fn new(columns: usize, rows: usize, learning_rate: f64, discount_rate: f64) -> Self {
        Self {
            scores: vec![[0.0; ACTION_COUNT]; columns * rows],
            columns,
            rows,
            learning_rate,
            discount_rate,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    fn offset(&self, cell: GridCell) -> Result<usize> {
        let in_range = cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.columns
            && (cell.y as usize) < self.rows;
        if !in_range {
            return Err(Error::CellOutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.columns,
                height: self.rows,
            });
        }
        Ok(cell.x as usize * self.rows + cell.y as usize)
    }

    /// All four scores at a cell
    pub fn get(&self, cell: GridCell) -> Result<&ScoreRow> {
        let offset = self.offset(cell)?;
        Ok(&self.scores[offset])
    }

    /// Replace the score of one action at a cell
    pub fn set(&mut self, cell: GridCell, action: Action, value: f64) -> Result<()> {
        let offset = self.offset(cell)?;
        self.scores[offset][action.index()] = value;
        Ok(())
    }

    /// Highest score at a cell
    pub fn max_value(&self, cell: GridCell) -> Result<f64> {
        Ok(max_score(self.get(cell)?))
    }

    /// Deterministic greedy action (first maximum), used for policy display
    pub fn greedy_action(&self, cell: GridCell) -> Result<Action> {
        let row = self.get(cell)?;
        let best = max_score(row);
        let index = row.iter().position(|&score| score == best).unwrap_or(0);
        Ok(Action::ALL[index])
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Returns the value before and after the update.
    pub fn q_learning_update(
        &mut self,
        state: GridCell,
        action: Action,
        reward: f64,
        next_state: GridCell,
    ) -> Result<(f64, f64)> {
        let max_next_q = self.max_value(next_state)?;
        let offset = self.offset(state)?;
        let current_q = self.scores[offset][action.index()];
        let td_target = reward + self.discount_rate * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        self.scores[offset][action.index()] = new_q;
        Ok((current_q, new_q))
    }

    /// Zero every score
    pub fn reset(&mut self) {
        self.scores.fill([0.0; ACTION_COUNT]);
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.scores.len()
    }

    /// Iterate over `(cell, scores)` pairs in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridCell, &ScoreRow)> + '_ {
        let rows = self.rows;
        self.scores.iter().enumerate().map(move |(offset, row)| {
            let cell = GridCell::new((offset / rows) as i64, (offset % rows) as i64);
            (cell, row)
        })
    }
}

/// Maximum over a score row. NaN entries are ignored.
pub fn max_score(row: &ScoreRow) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
