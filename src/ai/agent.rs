use crate::game::{Grid, Player};

use super::search::Searcher;

/// Anything that can choose a column for one side.
pub trait Agent {
    /// Select a column for `player`, or `None` if no column accepts a token.
    fn select_action(&mut self, grid: &Grid, player: Player) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Plays the move found by a synchronous [`Searcher`] run.
#[derive(Clone)]
pub struct SearchAgent {
    searcher: Searcher,
    max_depth: usize,
}

impl SearchAgent {
    pub fn new(searcher: Searcher, max_depth: usize) -> Self {
        SearchAgent {
            searcher,
            max_depth,
        }
    }
}

impl Agent for SearchAgent {
    fn select_action(&mut self, grid: &Grid, player: Player) -> Option<usize> {
        self.searcher.best_move(grid, player, self.max_depth).column
    }

    fn name(&self) -> &str {
        "Search"
    }
}
