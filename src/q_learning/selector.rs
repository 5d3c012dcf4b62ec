//! Greedy action selection with random tie-breaking

use rand::{Rng, seq::IndexedRandom};

use crate::{
    q_learning::q_table::{ScoreRow, max_score},
    types::{ACTION_COUNT, Action},
};

/// Greedy value estimate for a cell: the best score in its row.
pub fn expected_reward(scores: &ScoreRow) -> f64 {
    max_score(scores)
}

/// Pick an action whose score equals the row maximum, uniformly among ties.
///
/// Comparison is exact, so a fresh all-zero row ties on every action. There
/// is no exploration beyond this tie-breaking.
pub fn select_action<R: Rng + ?Sized>(scores: &ScoreRow, rng: &mut R) -> Action {
    let best = expected_reward(scores);
    let mut tied = [Action::Right; ACTION_COUNT];
    let mut count = 0;
    for action in Action::ALL {
        if scores[action.index()] == best {
            tied[count] = action;
            count += 1;
        }
    }

    // Empty only when every score is NaN.
    let candidates: &[Action] = if count == 0 {
        &Action::ALL
    } else {
        &tied[..count]
    };
    *candidates.choose(rng).unwrap_or(&Action::Right)
}
