mod display;
mod game;
mod human;
mod reports;
pub use display::*;
pub use game::*;
pub use human::*;
pub use reports::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Config {
    pub rng: StdRng,
    /// After this many rounds without a winner, the game is abandoned.
    pub max_rounds: u32,
}

impl Config {
    pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }
}
