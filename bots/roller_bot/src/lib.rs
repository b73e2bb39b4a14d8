use cantstop::{Decision, Player, RollChoice, State};
use cantstop_bot_utils::prefer_chosen_columns;
use tracing::debug;

/// Rolls a fixed number of times per turn, then stops.
///
/// Always prefers the columns it already climbed.
pub struct RollerBot {
    name: String,
    budget: u32,
    /// Attempts left in the current turn, including the current one.
    remaining: u32,
}

impl RollerBot {
    /// A budget of 0 behaves like a budget of 1.
    pub fn new(name: impl Into<String>, budget: u32) -> Self {
        let budget = budget.max(1);
        Self {
            name: name.into(),
            budget,
            remaining: budget,
        }
    }

    pub fn quad(name: impl Into<String>) -> Self {
        Self::new(name, 4)
    }

    pub fn hex(name: impl Into<String>) -> Self {
        Self::new(name, 6)
    }

    pub fn septa(name: impl Into<String>) -> Self {
        Self::new(name, 7)
    }

    pub fn octo(name: impl Into<String>) -> Self {
        Self::new(name, 8)
    }

    pub fn deca(name: impl Into<String>) -> Self {
        Self::new(name, 10)
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    fn end_of_turn(&mut self) {
        self.remaining = self.budget;
    }
}

impl Player for RollerBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self) {
        self.end_of_turn();
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        debug!(
            player = %self.name,
            attempt = self.budget - self.remaining + 1,
            "Choosing"
        );
        prefer_chosen_columns(state, &self.name)
    }

    fn stop_or_continue(&mut self, _state: &State) -> Decision {
        if self.remaining <= 1 {
            debug!(player = %self.name, "Out of steam");
            self.end_of_turn();
            Decision::Stop
        } else {
            self.remaining -= 1;
            Decision::Continue
        }
    }

    fn bust_out(&mut self) {
        self.end_of_turn();
    }
}

#[cfg(test)]
mod tests {
    use cantstop::{execute_turn, Board, DiceSet, TurnOutcome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn stops_after_budget() {
        let board = {
            let mut board = Board::new();
            board.add_player("bot").unwrap();
            board
        };
        let state = State::new(vec![], &board, 1);
        let mut bot = RollerBot::quad("bot");
        for _ in 0..2 {
            let decisions: Vec<Decision> = (0..4).map(|_| bot.stop_or_continue(&state)).collect();
            assert_eq!(
                decisions,
                vec![
                    Decision::Continue,
                    Decision::Continue,
                    Decision::Continue,
                    Decision::Stop
                ]
            );
        }
    }

    #[test]
    fn budgets() {
        let budgets: Vec<u32> = [
            RollerBot::quad("q"),
            RollerBot::hex("h"),
            RollerBot::septa("s"),
            RollerBot::octo("o"),
            RollerBot::deca("d"),
            RollerBot::new("zero", 0),
        ]
        .iter()
        .map(RollerBot::budget)
        .collect();
        assert_eq!(budgets, vec![4, 6, 7, 8, 10, 1]);
    }

    #[test]
    fn bust_resets_the_budget() {
        let board = Board::new();
        let state = State::new(vec![], &board, 1);
        let mut bot = RollerBot::new("bot", 3);
        assert_eq!(bot.stop_or_continue(&state), Decision::Continue);
        bot.bust_out();
        assert_eq!(bot.stop_or_continue(&state), Decision::Continue);
        assert_eq!(bot.stop_or_continue(&state), Decision::Continue);
        assert_eq!(bot.stop_or_continue(&state), Decision::Stop);
    }

    #[test]
    fn turns_never_exceed_the_budget() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut dice = DiceSet::new(&mut rng);
        let mut board = Board::new();
        board.add_player("bot").unwrap();
        let mut bot = RollerBot::hex("bot");
        let budget = bot.budget();
        for round in 1..=30 {
            let attempts = match execute_turn(&mut board, &mut dice, &mut rng, &mut bot, round) {
                Ok(TurnOutcome::Busted { attempts }) => attempts,
                Ok(TurnOutcome::Stopped { attempts, .. }) => {
                    assert_eq!(attempts, budget);
                    attempts
                }
                Err(err) => panic!("{}", err),
            };
            assert!(attempts <= budget);
            if board.check_for_winner().is_some() {
                break;
            }
        }
    }
}
