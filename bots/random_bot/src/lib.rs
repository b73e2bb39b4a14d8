use cantstop::{Decision, Player, RollChoice, State};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Picks a random choice, and stops with a fixed probability after each roll.
pub struct RandomBot {
    name: String,
    rng: StdRng,
    stop_probability: f64,
}

impl RandomBot {
    pub const DEFAULT_STOP_PROBABILITY: f64 = 0.3;

    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self::with_stop_probability(name, seed, Self::DEFAULT_STOP_PROBABILITY)
    }

    /// `stop_probability` is clamped to [0, 1]. NaN falls back to
    /// [`Self::DEFAULT_STOP_PROBABILITY`].
    pub fn with_stop_probability(name: impl Into<String>, seed: u64, stop_probability: f64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
            stop_probability: if stop_probability.is_nan() {
                Self::DEFAULT_STOP_PROBABILITY
            } else {
                stop_probability.clamp(0.0, 1.0)
            },
        }
    }
}

impl Player for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_columns(&mut self, state: &State) -> RollChoice {
        let choice = state
            .choices
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| RollChoice(Vec::new()));
        trace!(player = %self.name, %choice, "Random choice");
        choice
    }

    fn stop_or_continue(&mut self, _state: &State) -> Decision {
        if self.rng.gen_bool(self.stop_probability) {
            Decision::Stop
        } else {
            Decision::Continue
        }
    }
}
