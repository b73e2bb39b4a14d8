use anyhow::bail;
use cantstop::{
    execute_turn, Board, Decision, DiceSet, IllegalMove, Player, RollChoice, State, TurnError,
    TurnOutcome,
};
use rand::seq::SliceRandom;
use tracing::{debug, enabled, info, trace, warn, Level};

use crate::Config;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player_idx: usize, rounds: u32 },
    /// Nobody won within `Config::max_rounds`.
    Runaway { rounds: u32 },
    IllegalMoveByPlayer { player_idx: usize, err: IllegalMove },
}

/// Traces every state handed to the wrapped player as JSON.
struct Traced<'a, P: ?Sized>(&'a mut P);

impl<P: Player + ?Sized> Traced<'_, P> {
    fn trace_state(&self, state: &State) {
        if !enabled!(Level::TRACE) {
            return;
        }
        match serde_json::to_string(state) {
            Ok(json) => trace!(player = self.0.name(), state = %json),
            Err(err) => warn!(%err, "Could not serialize state"),
        }
    }
}

impl<P: Player + ?Sized> Player for Traced<'_, P> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn new_game(&mut self) {
        self.0.new_game()
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        self.trace_state(state);
        self.0.choose_columns(state)
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        self.trace_state(state);
        self.0.stop_or_continue(state)
    }

    fn bust_out(&mut self) {
        self.0.bust_out()
    }
}

/// Plays one match between `players`, in a random seating order.
///
/// Returns an error only for a bad setup or a broken board, not when an
/// illegal move is played. Player indices in the result refer to `players`.
pub fn play_game<P: Player + ?Sized>(
    config: &mut Config,
    players: &mut [Box<P>],
) -> anyhow::Result<GameResult> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
        bail!(
            "A game needs {} to {} players, got {}",
            MIN_PLAYERS,
            MAX_PLAYERS,
            players.len()
        );
    }

    let mut seating: Vec<usize> = (0..players.len()).collect();
    seating.shuffle(&mut config.rng);

    let mut board = Board::new();
    for &player_idx in &seating {
        board.add_player(players[player_idx].name())?;
    }
    debug!(seating = ?board.players(), "New game");

    // Inform the players about the new game, so that they can reset their state
    for player in players.iter_mut() {
        player.new_game();
    }

    let mut dice = DiceSet::new(&mut config.rng);
    for round in 1..=config.max_rounds {
        for &player_idx in &seating {
            let player = &mut Traced(players[player_idx].as_mut());
            match execute_turn(&mut board, &mut dice, &mut config.rng, player, round) {
                Ok(TurnOutcome::Stopped { .. }) => {
                    if let Some(winner) = board.check_for_winner() {
                        info!(winner, round, "Game over");
                        return Ok(GameResult::WonByPlayer {
                            player_idx,
                            rounds: round,
                        });
                    }
                }
                Ok(TurnOutcome::Busted { .. }) => {}
                Err(TurnError::IllegalMove(err)) => {
                    return Ok(GameResult::IllegalMoveByPlayer { player_idx, err });
                }
                Err(TurnError::IllegalState(err)) => return Err(err.into()),
            }
        }
    }

    warn!(rounds = config.max_rounds, "Nobody won, giving up");
    Ok(GameResult::Runaway {
        rounds: config.max_rounds,
    })
}
