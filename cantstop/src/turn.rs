use rand::Rng;
use tracing::debug;

use crate::{Board, ColumnId, Decision, DiceSet, IllegalMove, Player, State, TurnError};

/// Summarizes how a turn ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No choice was possible, and the progress of this turn was lost.
    Busted { attempts: u32 },
    /// The player stopped and committed its progress.
    Stopped {
        attempts: u32,
        /// The columns that the player won by stopping.
        completed: Vec<ColumnId>,
    },
}

/// Plays one turn of `player`: roll, choose, and decide whether to go on,
/// until the player stops or busts.
///
/// `round` is passed on to the player in the [`State`]. An illegal choice
/// discards the turn's progress before the error is returned.
pub fn execute_turn<R, P>(
    board: &mut Board,
    dice: &mut DiceSet,
    rng: &mut R,
    player: &mut P,
    round: u32,
) -> Result<TurnOutcome, TurnError>
where
    R: Rng + ?Sized,
    P: Player + ?Sized,
{
    let name = String::from(player.name());
    let mut attempts = 0;
    loop {
        attempts += 1;
        dice.roll(rng);
        let choices = board.get_roll_choices(&name, &dice.get_sums())?;
        if choices.is_empty() {
            debug!(player = %name, dice = ?dice.values(), attempts, "Busted");
            board.bust();
            player.bust_out();
            return Ok(TurnOutcome::Busted { attempts });
        }

        let state = State::new(choices, board, round);
        let choice = player.choose_columns(&state);
        if !state.choices.contains(&choice) {
            board.reset_progress();
            return Err(IllegalMove::ChoiceNotOffered { choice }.into());
        }
        board.register_roll_choice(&choice, &name);

        let state = State::new(state.choices, board, round);
        if player.stop_or_continue(&state) == Decision::Stop {
            let completed = board.register_stop_choice(&name)?;
            debug!(player = %name, attempts, ?completed, "Stopped");
            return Ok(TurnOutcome::Stopped {
                attempts,
                completed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{RollChoice, NUM_MARKERS};

    /// Takes the first choice, and continues a fixed number of times.
    struct Scripted {
        name: String,
        continues: u32,
        busts: u32,
        seen_states: Vec<State>,
    }

    impl Scripted {
        fn new(name: &str, continues: u32) -> Self {
            Self {
                name: String::from(name),
                continues,
                busts: 0,
                seen_states: Vec::new(),
            }
        }
    }

    impl Player for Scripted {
        fn name(&self) -> &str {
            &self.name
        }

        fn choose_columns(&mut self, state: &State) -> RollChoice {
            self.seen_states.push(state.clone());
            state.choices[0].clone()
        }

        fn stop_or_continue(&mut self, _state: &State) -> Decision {
            if self.continues == 0 {
                Decision::Stop
            } else {
                self.continues -= 1;
                Decision::Continue
            }
        }

        fn bust_out(&mut self) {
            self.busts += 1;
        }
    }

    struct Cheater;

    impl Player for Cheater {
        fn name(&self) -> &str {
            "cheater"
        }

        fn choose_columns(&mut self, _state: &State) -> RollChoice {
            RollChoice(vec![])
        }

        fn stop_or_continue(&mut self, _state: &State) -> Decision {
            Decision::Stop
        }
    }

    fn setup(players: &[&str], seed: u64) -> (Board, DiceSet, StdRng) {
        let mut board = Board::new();
        for player in players {
            board.add_player(player).unwrap();
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let dice = DiceSet::new(&mut rng);
        (board, dice, rng)
    }

    #[test]
    fn single_attempt_commits() {
        let (mut board, mut dice, mut rng) = setup(&["a"], 1);
        let mut player = Scripted::new("a", 0);
        let outcome = execute_turn(&mut board, &mut dice, &mut rng, &mut player, 1).unwrap();
        assert!(matches!(outcome, TurnOutcome::Stopped { attempts: 1, .. }));
        let committed: u8 = board.player_positions()[0].ranks.iter().sum();
        assert!((1..=2).contains(&committed));
        assert_eq!(board.free_markers(), NUM_MARKERS);
        assert_eq!(player.seen_states.len(), 1);
        assert_eq!(player.seen_states[0].turn, 1);
    }

    #[test]
    fn endless_rolling_busts() {
        for seed in 0..20 {
            let (mut board, mut dice, mut rng) = setup(&["a"], seed);
            let mut player = Scripted::new("a", u32::MAX);
            let outcome = execute_turn(&mut board, &mut dice, &mut rng, &mut player, 1).unwrap();
            assert!(matches!(outcome, TurnOutcome::Busted { .. }));
            assert_eq!(player.busts, 1);
            assert!(board.temporary_progress().is_empty());
            assert_eq!(board.player_positions()[0].ranks, [0; crate::NUM_COLUMNS]);
            // Every decision saw the markers it had left
            for state in &player.seen_states {
                assert!(state.temp_progress.len() <= NUM_MARKERS as usize);
            }
        }
    }

    #[test]
    fn choice_not_offered_is_illegal() {
        let (mut board, mut dice, mut rng) = setup(&["cheater"], 3);
        let result = execute_turn(&mut board, &mut dice, &mut rng, &mut Cheater, 1);
        assert!(matches!(
            result,
            Err(TurnError::IllegalMove(IllegalMove::ChoiceNotOffered { .. }))
        ));
        assert!(board.temporary_progress().is_empty());
    }

    #[test]
    fn unknown_player_is_illegal_state() {
        let (mut board, mut dice, mut rng) = setup(&["a"], 3);
        let mut player = Scripted::new("b", 0);
        let result = execute_turn(&mut board, &mut dice, &mut rng, &mut player, 1);
        assert!(matches!(result, Err(TurnError::IllegalState(_))));
    }
}
