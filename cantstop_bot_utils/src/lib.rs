mod hits;
pub use hits::*;

use cantstop::{ColumnId, RollChoice, State};
use tracing::trace;

/// The columns `name` already invested in: committed progress, or a marker this turn.
pub fn chosen_columns(state: &State, name: &str) -> Vec<ColumnId> {
    let mut columns = state.get_current_columns(name);
    for &column in state.temp_progress.keys() {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns.sort();
    columns
}

/// How many steps of `choice` land in `columns`. Doubles count twice.
pub fn overlap(choice: &RollChoice, columns: &[ColumnId]) -> usize {
    choice
        .columns()
        .iter()
        .filter(|column| columns.contains(column))
        .count()
}

/// Picks the choice with the most overlap with the columns `name` already
/// invested in. Ties go to the earliest choice.
///
/// Panics if `state.choices` is empty, which never happens for a state handed
/// to a player.
pub fn prefer_chosen_columns(state: &State, name: &str) -> RollChoice {
    let chosen = chosen_columns(state, name);
    let mut best_idx = 0;
    let mut best_overlap = 0;
    for (idx, choice) in state.choices.iter().enumerate() {
        let overlap = overlap(choice, &chosen);
        if overlap > best_overlap {
            best_idx = idx;
            best_overlap = overlap;
        }
    }
    trace!(player = name, best_idx, best_overlap, "Preferred choice");
    state.choices[best_idx].clone()
}

#[cfg(test)]
mod tests {
    use cantstop::Board;

    use super::*;

    pub(crate) fn c(value: u8) -> ColumnId {
        ColumnId::new(value).unwrap()
    }

    pub(crate) fn choice(values: &[u8]) -> RollChoice {
        RollChoice(values.iter().map(|&v| c(v)).collect())
    }

    #[test]
    fn overlap_counts_doubles() {
        let columns = [c(4), c(9)];
        assert_eq!(overlap(&choice(&[4, 4]), &columns), 2);
        assert_eq!(overlap(&choice(&[4, 10]), &columns), 1);
        assert_eq!(overlap(&choice(&[3]), &columns), 0);
    }

    #[test]
    fn prefers_columns_with_progress() {
        let mut board = Board::new();
        board.add_player("me").unwrap();
        board.add_player("other").unwrap();
        board.register_roll_choice(&choice(&[9]), "me");
        board.register_stop_choice("me").unwrap();
        board.register_roll_choice(&choice(&[5]), "me");

        let choices = vec![choice(&[3, 11]), choice(&[5, 6]), choice(&[5, 9])];
        let state = State::new(choices, &board, 2);
        assert_eq!(chosen_columns(&state, "me"), vec![c(5), c(9)]);
        assert_eq!(prefer_chosen_columns(&state, "me"), choice(&[5, 9]));
        // Nothing climbed yet, so the first choice wins
        assert_eq!(prefer_chosen_columns(&state, "other"), choice(&[3, 11]));
    }

    #[test]
    fn ties_go_to_the_first_choice() {
        let mut board = Board::new();
        board.add_player("me").unwrap();
        board.register_roll_choice(&choice(&[6, 8]), "me");
        let choices = vec![choice(&[2, 6]), choice(&[8, 12])];
        let state = State::new(choices, &board, 1);
        assert_eq!(prefer_chosen_columns(&state, "me"), choice(&[2, 6]));
    }
}
