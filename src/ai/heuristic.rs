use crate::game::{Cell, Direction, Grid, Player, RUN};

/// Score of a decided game. Dwarfs every open-line sum.
pub const FOUR_WEIGHT: i64 = 1_000_000_000;
/// Base weight of an open window holding three tokens of one colour.
pub const THREE_WEIGHT: i64 = 400_000;
/// Base weight of an open window holding two tokens of one colour.
pub const TWO_WEIGHT: i64 = 600;
/// Base weight of an open window holding a single token.
pub const ONE_WEIGHT: i64 = 1;

const OWN_FACTOR: i64 = 2;
/// Opponent windows count double: blocking beats extending.
const OPPONENT_FACTOR: i64 = 4;
const PLAYABLE_FACTOR: i64 = 2;

/// Trait for evaluating a grid from a player's perspective.
pub trait Heuristic: Send + Sync {
    fn evaluate(&self, grid: &Grid, player: Player) -> i64;
}

/// Which orientations contribute open-line scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineScoring {
    /// Rows only.
    #[default]
    Horizontal,
    /// Rows, columns and both diagonals.
    AllDirections,
}

impl LineScoring {
    fn directions(self) -> &'static [Direction] {
        match self {
            LineScoring::Horizontal => &[Direction::Horizontal],
            LineScoring::AllDirections => &Direction::ALL,
        }
    }
}

/// Default heuristic: a terminal term plus a weighted sum over open windows.
///
/// A window is open when it holds tokens of exactly one colour and at least
/// one empty cell. Its weight depends on the token count, doubles when every
/// empty cell in it could be filled on the very next move, and is signed by
/// whose tokens it holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineHeuristic {
    scoring: LineScoring,
}

impl LineHeuristic {
    pub fn new(scoring: LineScoring) -> Self {
        LineHeuristic { scoring }
    }

    pub fn scoring(&self) -> LineScoring {
        self.scoring
    }

    fn count_weight(count: usize) -> i64 {
        match count {
            1 => ONE_WEIGHT,
            2 => TWO_WEIGHT,
            3 => THREE_WEIGHT,
            _ => 0,
        }
    }

    fn score_window(grid: &Grid, window: &[(usize, usize); RUN], own: Cell) -> i64 {
        let cells = grid.window_cells(window);
        let empty = cells.iter().filter(|&&c| c == Cell::Empty).count();
        if empty == 0 || empty == RUN {
            return 0;
        }

        let Some(colour) = cells.iter().copied().find(|&c| c != Cell::Empty) else {
            return 0;
        };
        if cells.iter().any(|&c| c != Cell::Empty && c != colour) {
            return 0;
        }

        let playable = window.iter().all(|&(row, col)| {
            grid.get(row, col) != Cell::Empty || grid.is_immediately_playable(row, col)
        });
        let side = if colour == own {
            OWN_FACTOR
        } else {
            -OPPONENT_FACTOR
        };
        let tempo = if playable { PLAYABLE_FACTOR } else { 1 };

        side * tempo * Self::count_weight(RUN - empty)
    }
}

impl Heuristic for LineHeuristic {
    fn evaluate(&self, grid: &Grid, player: Player) -> i64 {
        let own = player.to_cell();
        let mut score = match grid.winner() {
            Cell::Empty => 0,
            winner if winner == own => FOUR_WEIGHT,
            _ => -FOUR_WEIGHT,
        };

        for &direction in self.scoring.directions() {
            score += direction
                .windows()
                .map(|window| Self::score_window(grid, &window, own))
                .sum::<i64>();
        }

        score
    }
}
