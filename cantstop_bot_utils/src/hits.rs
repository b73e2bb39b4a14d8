use std::collections::BTreeMap;

use cantstop::{ColumnId, HitPredictor, RollChoice, State, NUM_MARKERS};

/// The columns in which `name` could still use a roll, given its committed
/// ranks plus `temp_progress`.
///
/// With a free marker this is every column that is neither won nor topped
/// out for `name`; with all markers placed, only the marked ones qualify.
fn usable_columns_with(
    state: &State,
    name: &str,
    temp_progress: &BTreeMap<ColumnId, u8>,
) -> Vec<ColumnId> {
    let won = state.completed_columns();
    let committed = state.positions_of(name).map(|p| p.ranks);
    let markers_left = temp_progress.len() < usize::from(NUM_MARKERS);
    ColumnId::ALL
        .into_iter()
        .filter(|column| !won.contains_key(column))
        .filter(|&column| markers_left || temp_progress.contains_key(&column))
        .filter(|&column| {
            let rank = committed.map_or(0, |ranks| ranks[column.index()]);
            let temp = temp_progress.get(&column).copied().unwrap_or(0);
            rank.saturating_add(temp) < column.ranks()
        })
        .collect()
}

/// The columns in which `name` could use the next roll.
pub fn usable_columns(state: &State, name: &str) -> Vec<ColumnId> {
    usable_columns_with(state, name, &state.temp_progress)
}

/// Like [`usable_columns()`], but as if `choice` had been taken.
pub fn usable_columns_after(state: &State, name: &str, choice: &RollChoice) -> Vec<ColumnId> {
    let mut temp_progress = state.temp_progress.clone();
    for &column in choice.columns() {
        *temp_progress.entry(column).or_insert(0) += 1;
    }
    usable_columns_with(state, name, &temp_progress)
}

/// The probability that the next roll doesn't bust `name`.
pub fn next_attempt_odds(state: &State, name: &str) -> f64 {
    HitPredictor::get().hit_odds(usable_columns(state, name))
}

/// The probability that the roll after taking `choice` doesn't bust `name`.
pub fn next_attempt_odds_after(state: &State, name: &str, choice: &RollChoice) -> f64 {
    HitPredictor::get().hit_odds(usable_columns_after(state, name, choice))
}
