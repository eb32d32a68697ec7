//! Core four-in-a-row rules: the gravity grid, the two players, and the
//! match status reported to whoever drives the game.

mod board;
mod player;
mod state;

pub use board::{Cell, Direction, Grid, COLS, ROWS, RUN};
pub use player::Player;
pub use state::GameStatus;

#[cfg(test)]
pub(crate) use board::fixture;
