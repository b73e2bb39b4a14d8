use serde::{Deserialize, Serialize};

use crate::{RollChoice, State};

/// What to do after registering a roll choice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Commit this turn's progress and end the turn.
    Stop,
    /// Roll again, risking a bust.
    Continue,
}

/// A decision maker, either a human or a bot.
///
/// Players never touch the board; they only get to look at a [`State`].
pub trait Player {
    /// Unique among the players of a game.
    fn name(&self) -> &str;

    /// Called before a game starts, to reset any per-game state.
    fn new_game(&mut self) {}

    /// Must return one of `state.choices`.
    fn choose_columns(&mut self, state: &State) -> RollChoice;

    fn stop_or_continue(&mut self, state: &State) -> Decision;

    /// Called when the player's turn ended because no choice was possible.
    fn bust_out(&mut self) {}
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn new_game(&mut self) {
        (**self).new_game()
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        (**self).choose_columns(state)
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        (**self).stop_or_continue(state)
    }

    fn bust_out(&mut self) {
        (**self).bust_out()
    }
}
