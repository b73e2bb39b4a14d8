pub use board::*;
pub use column::*;
pub use dice::*;
pub use errors::*;
pub use odds::*;
pub use player::*;
pub use state::*;
pub use turn::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod column;
mod dice;
mod errors;
mod odds;
mod player;
mod state;
mod turn;
