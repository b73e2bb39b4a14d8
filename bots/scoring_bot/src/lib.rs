//! Bots that score the current turn before deciding whether to stop.

use cantstop::{perc, Decision, Player, RollChoice, State};
use cantstop_bot_utils::{next_attempt_odds, next_attempt_odds_after, prefer_chosen_columns};
use tracing::debug;

/// Stops once the turn scores 28 under the "Rule of 28".
///
/// Also stops when every marker is placed and stopping wins a column.
pub struct Rule28Bot {
    name: String,
}

impl Rule28Bot {
    pub const TARGET: i32 = 28;

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for Rule28Bot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        prefer_chosen_columns(state, &self.name)
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        let score = state.rule28();
        let wins_column =
            state.free_markers() == 0 && !state.columns_won_by_stopping(&self.name).is_empty();
        debug!(player = %self.name, score, wins_column, "Rule of 28");
        if score >= Self::TARGET || wins_column {
            Decision::Stop
        } else {
            Decision::Continue
        }
    }
}

/// Picks the choice that leaves the best odds for the next roll, and stops
/// when those odds get too low.
pub struct OddsBot {
    name: String,
    threshold: f64,
}

impl OddsBot {
    pub const DEFAULT_THRESHOLD: f64 = 0.75;

    pub fn new(name: impl Into<String>) -> Self {
        Self::with_threshold(name, Self::DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(name: impl Into<String>, threshold: f64) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }
}

impl Player for OddsBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        let mut best: Option<(f64, &RollChoice)> = None;
        for choice in &state.choices {
            let odds = next_attempt_odds_after(state, &self.name, choice);
            // Ties go to the longer choice, which climbs further
            let better = match best {
                None => true,
                Some((best_odds, best_choice)) => {
                    odds > best_odds
                        || (odds == best_odds && choice.columns().len() > best_choice.columns().len())
                }
            };
            if better {
                best = Some((odds, choice));
            }
        }
        match best {
            Some((odds, choice)) => {
                debug!(player = %self.name, %choice, odds = perc(odds), "Best odds");
                choice.clone()
            }
            None => RollChoice(Vec::new()),
        }
    }

    fn stop_or_continue(&mut self, state: &State) -> Decision {
        if !state.columns_won_by_stopping(&self.name).is_empty() {
            return Decision::Stop;
        }
        let odds = next_attempt_odds(state, &self.name);
        if odds < self.threshold {
            debug!(player = %self.name, odds = perc(odds), "Odds too low");
            Decision::Stop
        } else {
            Decision::Continue
        }
    }
}
