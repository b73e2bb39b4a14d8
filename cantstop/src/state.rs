use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Board, ColumnId, PlayerProgress, RollChoice, NUM_COLUMNS, NUM_MARKERS};

/// What a player gets to see when it has to make a decision.
///
/// Built fresh from the board before every decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// The choices for the current roll. Never empty.
    pub choices: Vec<RollChoice>,
    /// The committed ranks of all players, in seating order.
    pub player_positions: Vec<PlayerProgress>,
    /// The uncommitted progress of the current turn.
    pub temp_progress: BTreeMap<ColumnId, u8>,
    /// The current round, starting at 1.
    pub turn: u32,
}

impl State {
    pub fn new(choices: Vec<RollChoice>, board: &Board, turn: u32) -> Self {
        Self {
            choices,
            player_positions: board.player_positions(),
            temp_progress: board.temporary_progress().clone(),
            turn,
        }
    }

    pub fn free_markers(&self) -> u8 {
        NUM_MARKERS.saturating_sub(self.temp_progress.len() as u8)
    }

    pub fn positions_of(&self, name: &str) -> Option<&PlayerProgress> {
        self.player_positions.iter().find(|p| p.name == name)
    }

    /// The columns in which `name` has committed progress.
    pub fn get_current_columns(&self, name: &str) -> Vec<ColumnId> {
        match self.positions_of(name) {
            Some(progress) => ColumnId::ALL
                .into_iter()
                .filter(|&column| progress.rank(column) > 0)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Committed plus temporary progress of `name`, capped at each column's top.
    pub fn combined_progress(&self, name: &str) -> [u8; NUM_COLUMNS] {
        let mut ranks = self.positions_of(name).map_or([0; NUM_COLUMNS], |p| p.ranks);
        for (&column, &temp) in &self.temp_progress {
            let rank = &mut ranks[column.index()];
            *rank = rank.saturating_add(temp).min(column.ranks());
        }
        ranks
    }

    /// The owner of every column that has been won.
    ///
    /// Inferred from the positions: whoever sits at the top owns the column.
    pub fn completed_columns(&self) -> BTreeMap<ColumnId, &str> {
        let mut completed = BTreeMap::new();
        for progress in &self.player_positions {
            for column in ColumnId::ALL {
                if progress.rank(column) == column.ranks() {
                    completed.insert(column, progress.name.as_str());
                }
            }
        }
        completed
    }

    /// The columns `name` would own if it stopped now.
    pub fn columns_won_by_stopping(&self, name: &str) -> Vec<ColumnId> {
        let committed = self.positions_of(name).map_or([0; NUM_COLUMNS], |p| p.ranks);
        let combined = self.combined_progress(name);
        self.temp_progress
            .keys()
            .copied()
            .filter(|c| committed[c.index()] < c.ranks() && combined[c.index()] == c.ranks())
            .collect()
    }

    /// Scores the current turn with the "Rule of 28" heuristic.
    ///
    /// Every rank of temporary progress in a column weighs more the further
    /// that column is from 7, and placing a marker counts as a rank. Three odd
    /// columns get a bonus since they roll together less often; three even
    /// columns get a penalty.
    pub fn rule28(&self) -> i32 {
        let mut score = 0;
        let mut product: u32 = 1;
        for (&column, &temp) in &self.temp_progress {
            score += weight_column(column) * (i32::from(temp) + 1);
            product *= u32::from(column.value());
        }
        if product > 1 && product % 2 == 1 {
            score += 2;
        }
        if product % 8 == 0 {
            score -= 2;
        }
        score
    }
}

/// The weight of a column for [`State::rule28()`]: 1 for column 7, up to 6 at the edges.
pub fn weight_column(column: ColumnId) -> i32 {
    let c = i32::from(column.value());
    if c <= 7 {
        8 - c
    } else {
        c - 6
    }
}
