//! Bots that never push their luck much.

use cantstop::{Decision, Player, RollChoice, State, NUM_MARKERS};
use cantstop_bot_utils::prefer_chosen_columns;
use tracing::debug;

/// Takes the first choice and stops right away.
pub struct CowardBot {
    name: String,
}

impl CowardBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for CowardBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        state.choices[0].clone()
    }

    fn stop_or_continue(&mut self, _state: &State) -> Decision {
        Decision::Stop
    }
}

/// Like [`CowardBot`], but takes the choice that climbs columns it already climbed.
pub struct SmartCowardBot {
    name: String,
}

impl SmartCowardBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for SmartCowardBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        prefer_chosen_columns(state, &self.name)
    }

    fn stop_or_continue(&mut self, _state: &State) -> Decision {
        Decision::Stop
    }
}

/// Keeps rolling until all markers are placed.
pub struct ConservativeBot {
    name: String,
}

impl ConservativeBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for ConservativeBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        prefer_chosen_columns(state, &self.name)
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        if state.temp_progress.len() < usize::from(NUM_MARKERS) {
            Decision::Continue
        } else {
            debug!(player = %self.name, "No free markers left");
            Decision::Stop
        }
    }
}

#[cfg(test)]
mod tests {
    use cantstop::{Board, ColumnId};

    use super::*;

    fn choice(values: &[u8]) -> RollChoice {
        RollChoice(values.iter().map(|&v| ColumnId::new(v).unwrap()).collect())
    }

    fn board() -> Board {
        let mut board = Board::new();
        board.add_player("bot").unwrap();
        board.add_player("other").unwrap();
        board.register_roll_choice(&choice(&[10]), "bot");
        board.register_stop_choice("bot").unwrap();
        board
    }

    #[test]
    fn coward_takes_the_first_choice() {
        let state = State::new(vec![choice(&[3, 4]), choice(&[10])], &board(), 1);
        let mut bot = CowardBot::new("bot");
        assert_eq!(bot.choose_columns(&state), choice(&[3, 4]));
        assert_eq!(bot.stop_or_continue(&state), Decision::Stop);
    }

    #[test]
    fn smart_coward_prefers_its_columns() {
        let state = State::new(vec![choice(&[3, 4]), choice(&[10])], &board(), 1);
        let mut bot = SmartCowardBot::new("bot");
        assert_eq!(bot.choose_columns(&state), choice(&[10]));
        assert_eq!(bot.stop_or_continue(&state), Decision::Stop);
    }

    #[test]
    fn conservative_stops_without_markers() {
        let mut board = board();
        let mut bot = ConservativeBot::new("bot");

        board.register_roll_choice(&choice(&[5, 6]), "bot");
        let state = State::new(vec![choice(&[5, 6])], &board, 1);
        assert_eq!(bot.stop_or_continue(&state), Decision::Continue);

        board.register_roll_choice(&choice(&[7]), "bot");
        let state = State::new(vec![choice(&[7])], &board, 1);
        assert_eq!(bot.stop_or_continue(&state), Decision::Stop);
    }
}
