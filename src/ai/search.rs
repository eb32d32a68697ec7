use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::game::{Grid, Player, COLS};

use super::heuristic::{Heuristic, LineHeuristic};

/// Score and column chosen by a search. `column` is `None` when the grid has
/// no legal move left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i64,
    pub column: Option<usize>,
}

impl SearchResult {
    pub const NO_MOVE: SearchResult = SearchResult {
        score: i64::MIN,
        column: None,
    };
}

/// Depth-bounded best-move search.
///
/// Every ply maximises the score of the side moving at that ply, evaluated
/// from that side's own perspective; scores are not negated between plies.
/// A move that wins on the spot is taken without looking any deeper.
#[derive(Clone)]
pub struct Searcher {
    heuristic: Arc<dyn Heuristic>,
}

impl Searcher {
    pub fn new(heuristic: Arc<dyn Heuristic>) -> Self {
        Searcher { heuristic }
    }

    /// Pick a column for `player`, looking `max_depth` plies past the first.
    pub fn best_move(&self, grid: &Grid, player: Player, max_depth: usize) -> SearchResult {
        let never = AtomicBool::new(false);
        self.search(grid, player, max_depth, 0, &never)
            .unwrap_or(SearchResult::NO_MOVE)
    }

    /// Like [`best_move`](Self::best_move), but gives up and returns `None`
    /// once `cancel` is set. The flag is checked before every child expansion.
    pub fn best_move_cancellable(
        &self,
        grid: &Grid,
        player: Player,
        max_depth: usize,
        cancel: &AtomicBool,
    ) -> Option<SearchResult> {
        self.search(grid, player, max_depth, 0, cancel)
    }

    fn search(
        &self,
        grid: &Grid,
        player: Player,
        max_depth: usize,
        depth: usize,
        cancel: &AtomicBool,
    ) -> Option<SearchResult> {
        let mut children = Vec::with_capacity(COLS);
        for col in grid.legal_moves() {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let mut child = *grid;
            if child.apply_move(col, player).is_ok() {
                children.push((col, child));
            }
        }

        let own = player.to_cell();
        if let Some((col, child)) = children.iter().find(|(_, child)| child.winner() == own) {
            return Some(SearchResult {
                score: self.heuristic.evaluate(child, player),
                column: Some(*col),
            });
        }

        let mut best: Option<SearchResult> = None;
        for (col, child) in &children {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let score = if depth == max_depth {
                self.heuristic.evaluate(child, player)
            } else {
                self.search(child, player.other(), max_depth, depth + 1, cancel)?
                    .score
            };
            // Strict comparison keeps the lowest column among equal scores.
            if best.map_or(true, |b| score > b.score) {
                best = Some(SearchResult {
                    score,
                    column: Some(*col),
                });
            }
        }

        Some(best.unwrap_or(SearchResult::NO_MOVE))
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(Arc::new(LineHeuristic::default()))
    }
}

/// Search with the default heuristic.
pub fn best_move(grid: &Grid, player: Player, max_depth: usize) -> SearchResult {
    Searcher::default().best_move(grid, player, max_depth)
}
