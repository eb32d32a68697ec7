use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use super::Player;
use crate::error::{GridParseError, MoveError};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

const CELLS: usize = ROWS * COLS;

/// Length of a winning run.
pub const RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    fn marker(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Red => '#',
            Cell::Yellow => 'o',
        }
    }

    fn from_marker(marker: char) -> Option<Cell> {
        match marker {
            ' ' => Some(Cell::Empty),
            '#' => Some(Cell::Red),
            'o' => Some(Cell::Yellow),
            _ => None,
        }
    }
}

/// Orientation of a run of [`RUN`] cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right, `\`
    DiagonalDown,
    /// Bottom-left to top-right, `/`
    DiagonalUp,
}

impl Direction {
    /// Scan order used by [`Grid::winner`].
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalUp,
    ];

    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (-1, 1),
        }
    }

    /// Rows and columns where a run in this direction may start.
    fn starts(self) -> (Range<usize>, Range<usize>) {
        let last = RUN - 1;
        match self {
            Direction::Horizontal => (0..ROWS, 0..COLS - last),
            Direction::Vertical => (0..ROWS - last, 0..COLS),
            Direction::DiagonalDown => (0..ROWS - last, 0..COLS - last),
            Direction::DiagonalUp => (last..ROWS, 0..COLS - last),
        }
    }

    /// Every window of [`RUN`] consecutive `(row, column)` positions in this
    /// direction, row-major by starting cell.
    pub fn windows(self) -> impl Iterator<Item = [(usize, usize); RUN]> {
        let (rows, cols) = self.starts();
        let (dr, dc) = self.step();
        rows.flat_map(move |row| {
            cols.clone().map(move |col| {
                std::array::from_fn(|i| {
                    let r = row as isize + dr * i as isize;
                    let c = col as isize + dc * i as isize;
                    (r as usize, c as usize)
                })
            })
        })
    }
}

#[inline]
fn index(row: usize, col: usize) -> usize {
    assert!(row < ROWS && col < COLS, "cell ({row}, {col}) out of bounds");
    row * COLS + col
}

/// The 6x7 playing grid. Row 0 is the top, row 5 is the bottom.
///
/// `Grid` is a plain `Copy` value: every copy handed to the search is fully
/// independent of the authoritative game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cells: [Cell; CELLS],
    last_column: Option<usize>,
    finished: bool,
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Grid {
            cells: [Cell::Empty; CELLS],
            last_column: None,
            finished: false,
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[index(row, col)]
    }

    /// Column of the most recent placement.
    pub fn last_column(&self) -> Option<usize> {
        self.last_column
    }

    /// True once somebody has won or no column accepts another token.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of tokens on the grid.
    pub fn token_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    /// Whether a token dropped in `col` on the very next move would land on
    /// `(row, col)`.
    pub fn is_immediately_playable(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Cell::Empty && (row == ROWS - 1 || self.get(row + 1, col) != Cell::Empty)
    }

    /// Columns that still accept a token, ascending.
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Drop a token in a column, returns the row where it landed.
    ///
    /// A rejected move leaves the grid untouched.
    pub fn apply_move(&mut self, col: usize, player: Player) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn { column: col });
        }
        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull { column: col });
        }

        let Some(row) = (0..ROWS).rev().find(|&row| self.get(row, col) == Cell::Empty) else {
            unreachable!("column {col} has an empty top but no landing row");
        };

        self.cells[index(row, col)] = player.to_cell();
        self.last_column = Some(col);
        self.refresh_finished();
        Ok(row)
    }

    /// The colour of the first uniform run of four, or `Cell::Empty`.
    pub fn winner(&self) -> Cell {
        Direction::ALL
            .iter()
            .flat_map(|direction| direction.windows())
            .map(|window| self.window_cells(&window))
            .find(|cells| cells[0] != Cell::Empty && cells.iter().all(|&c| c == cells[0]))
            .map_or(Cell::Empty, |cells| cells[0])
    }

    /// The cells covered by a window.
    pub fn window_cells(&self, window: &[(usize, usize); RUN]) -> [Cell; RUN] {
        window.map(|(row, col)| self.get(row, col))
    }

    /// Clear every cell for a new game.
    pub fn reset(&mut self) {
        *self = Grid::new();
    }

    fn refresh_finished(&mut self) {
        self.finished = self.winner() != Cell::Empty || self.legal_moves().is_empty();
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Two characters per cell (`"  "`, `"# "` or `"o "`) and a trailing space per
/// row, then a line of column indices.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                write!(f, "{} ", self.get(row, col).marker())?;
            }
            writeln!(f, " ")?;
        }
        for col in 0..COLS {
            write!(f, "{col} ")?;
        }
        writeln!(f)
    }
}

/// Parses the [`Display`](fmt::Display) dump back into a grid. The column
/// index line is optional and trailing whitespace may be trimmed.
impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines: Vec<&str> = s.lines().collect();
        if lines.len() == ROWS + 1 && lines[ROWS].trim_start().starts_with('0') {
            lines.pop();
        }
        if lines.len() != ROWS {
            return Err(GridParseError::RowCount {
                expected: ROWS,
                found: lines.len(),
            });
        }

        let mut grid = Grid::new();
        for (row, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            // Markers sit at even offsets; everything else must be a space.
            let misaligned = chars.len() > 2 * COLS + 1
                || chars
                    .iter()
                    .enumerate()
                    .any(|(i, &c)| (i % 2 == 1 || i >= 2 * COLS) && c != ' ');
            if misaligned {
                return Err(GridParseError::RowLayout { row });
            }
            for col in 0..COLS {
                let marker = chars.get(col * 2).copied().unwrap_or(' ');
                let cell = Cell::from_marker(marker).ok_or(GridParseError::UnknownMarker {
                    row,
                    column: col,
                    marker,
                })?;
                grid.cells[index(row, col)] = cell;
            }
        }

        for col in 0..COLS {
            for row in 0..ROWS - 1 {
                if grid.get(row, col) != Cell::Empty && grid.get(row + 1, col) == Cell::Empty {
                    return Err(GridParseError::Floating { row, column: col });
                }
            }
        }

        grid.refresh_finished();
        Ok(grid)
    }
}

/// Build a grid from compact rows, top first: `.` empty, `#` red, `o` yellow.
#[cfg(test)]
pub(crate) fn fixture(rows: [&str; ROWS]) -> Grid {
    let mut dump = String::new();
    for row in rows {
        for c in row.chars() {
            dump.push(if c == '.' { ' ' } else { c });
            dump.push(' ');
        }
        dump.push_str(" \n");
    }
    dump.parse().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn swap_colours(rows: [&str; ROWS]) -> [String; ROWS] {
        rows.map(|row| {
            row.chars()
                .map(|c| match c {
                    '#' => 'o',
                    'o' => '#',
                    other => other,
                })
                .collect()
        })
    }

    fn lowest_empty_row(grid: &Grid, col: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| grid.get(row, col) == Cell::Empty)
    }

    const DIAGONAL_DOWN: [&str; ROWS] = [
        ".......",
        ".......",
        "#......",
        "o#.....",
        "oo#....",
        "ooo#...",
    ];

    const DIAGONAL_UP: [&str; ROWS] = [
        ".......",
        ".......",
        "...#...",
        "..#o...",
        ".#oo...",
        "#ooo...",
    ];

    /// A full grid without any run of four.
    const DRAWN: [&str; ROWS] = [
        "##oo##o",
        "oo##oo#",
        "##oo##o",
        "oo##oo#",
        "##oo##o",
        "oo##oo#",
    ];

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(grid.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(grid.last_column(), None);
        assert!(!grid.is_finished());
        assert_eq!(grid.winner(), Cell::Empty);
    }

    #[test]
    fn test_apply_move() {
        let mut grid = Grid::new();

        let row = grid.apply_move(3, Player::Red).unwrap();
        assert_eq!(row, 5);
        assert_eq!(grid.get(5, 3), Cell::Red);
        assert_eq!(grid.last_column(), Some(3));

        let row = grid.apply_move(3, Player::Yellow).unwrap();
        assert_eq!(row, 4);
        assert_eq!(grid.get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_gravity_on_random_games() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new();
            let mut player = Player::Red;

            while !grid.is_finished() {
                let legal = grid.legal_moves();
                let col = legal[rng.random_range(0..legal.len())];
                let before = grid.token_count();
                let expected_row = lowest_empty_row(&grid, col);

                let row = grid.apply_move(col, player).unwrap();

                assert_eq!(Some(row), expected_row);
                assert_eq!(grid.token_count(), before + 1);
                player = player.other();
            }
        }
    }

    #[test]
    fn test_column_full_is_rejected_without_change() {
        let mut grid = Grid::new();
        let mut player = Player::Red;
        for _ in 0..ROWS {
            grid.apply_move(0, player).unwrap();
            player = player.other();
        }

        assert!(grid.is_column_full(0));
        let before = grid;
        assert_eq!(
            grid.apply_move(0, Player::Yellow),
            Err(MoveError::ColumnFull { column: 0 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn test_invalid_column() {
        let mut grid = Grid::new();
        assert_eq!(
            grid.apply_move(COLS, Player::Red),
            Err(MoveError::InvalidColumn { column: COLS })
        );
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_legal_moves_skip_full_column() {
        let mut grid = Grid::new();
        let mut player = Player::Red;
        for _ in 0..ROWS {
            grid.apply_move(2, player).unwrap();
            player = player.other();
        }
        assert_eq!(grid.legal_moves(), vec![0, 1, 3, 4, 5, 6]);
        assert!(!grid.is_finished());
    }

    #[test]
    fn test_filling_every_column_finishes_the_game() {
        let drawn = fixture(DRAWN);
        let mut grid = Grid::new();
        let mut remaining = CELLS;
        for col in 0..COLS {
            for row in (0..ROWS).rev() {
                assert!(!grid.is_finished());
                let player = Player::from_cell(drawn.get(row, col)).unwrap();
                grid.apply_move(col, player).unwrap();
                remaining -= 1;
            }
        }
        assert_eq!(remaining, 0);
        assert!(grid.legal_moves().is_empty());
        assert!(grid.is_finished());
        assert_eq!(grid.winner(), Cell::Empty);
    }

    #[test]
    fn test_horizontal_win() {
        let mut grid = Grid::new();
        for col in 0..4 {
            grid.apply_move(col, Player::Red).unwrap();
        }
        assert_eq!(grid.winner(), Cell::Red);
        assert!(grid.is_finished());
    }

    #[test]
    fn test_horizontal_win_yellow_in_upper_row() {
        let grid = fixture([
            ".......",
            ".......",
            ".......",
            ".......",
            ".oooo..",
            ".##o#..",
        ]);
        assert_eq!(grid.winner(), Cell::Yellow);
    }

    #[test]
    fn test_vertical_win() {
        for player in [Player::Red, Player::Yellow] {
            let mut grid = Grid::new();
            for _ in 0..3 {
                grid.apply_move(3, player).unwrap();
            }
            assert_eq!(grid.winner(), Cell::Empty);
            grid.apply_move(3, player).unwrap();
            assert_eq!(grid.winner(), player.to_cell());
            assert!(grid.is_finished());
        }
    }

    #[test]
    fn test_diagonal_down_win() {
        assert_eq!(fixture(DIAGONAL_DOWN).winner(), Cell::Red);
        let swapped = swap_colours(DIAGONAL_DOWN);
        let rows = swapped.each_ref().map(String::as_str);
        assert_eq!(fixture(rows).winner(), Cell::Yellow);
    }

    #[test]
    fn test_diagonal_up_win() {
        assert_eq!(fixture(DIAGONAL_UP).winner(), Cell::Red);
        let swapped = swap_colours(DIAGONAL_UP);
        let rows = swapped.each_ref().map(String::as_str);
        assert_eq!(fixture(rows).winner(), Cell::Yellow);
    }

    #[test]
    fn test_no_win_with_three() {
        let grid = fixture([
            ".......",
            ".......",
            ".......",
            "o......",
            "o#.....",
            "o##.#..",
        ]);
        assert_eq!(grid.winner(), Cell::Empty);
        assert!(!grid.is_finished());
    }

    #[test]
    fn test_red_bottom_row_scenario() {
        let mut grid = Grid::new();
        for col in 0..4 {
            let row = grid.apply_move(col, Player::Red).unwrap();
            assert_eq!(row, ROWS - 1);
        }
        assert_eq!(grid.winner(), Cell::Red);
        assert!(grid.is_finished());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = Grid::new();
        original.apply_move(3, Player::Red).unwrap();
        let snapshot = original;

        let mut copy = original;
        copy.apply_move(3, Player::Yellow).unwrap();
        copy.apply_move(0, Player::Red).unwrap();

        assert_eq!(original, snapshot);
        assert_eq!(original.get(4, 3), Cell::Empty);
        assert_eq!(copy.get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_reset() {
        let mut grid = Grid::new();
        for col in 0..4 {
            grid.apply_move(col, Player::Yellow).unwrap();
        }
        assert!(grid.is_finished());
        grid.reset();
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_immediately_playable() {
        let mut grid = Grid::new();
        assert!(grid.is_immediately_playable(5, 0));
        assert!(!grid.is_immediately_playable(4, 0));

        grid.apply_move(0, Player::Red).unwrap();
        assert!(!grid.is_immediately_playable(5, 0));
        assert!(grid.is_immediately_playable(4, 0));
        assert!(!grid.is_immediately_playable(3, 0));
    }

    #[test]
    fn test_window_counts() {
        assert_eq!(Direction::Horizontal.windows().count(), 24);
        assert_eq!(Direction::Vertical.windows().count(), 21);
        assert_eq!(Direction::DiagonalDown.windows().count(), 12);
        assert_eq!(Direction::DiagonalUp.windows().count(), 12);
        let first_up = Direction::DiagonalUp.windows().next().unwrap();
        assert_eq!(first_up, [(3, 0), (2, 1), (1, 2), (0, 3)]);
    }

    #[test]
    fn test_empty_dump() {
        let expected = format!("{}0 1 2 3 4 5 6 \n", format!("{} \n", " ".repeat(14)).repeat(ROWS));
        assert_eq!(Grid::new().to_string(), expected);
    }

    #[test]
    fn test_dump_markers() {
        let mut grid = Grid::new();
        grid.apply_move(0, Player::Red).unwrap();
        grid.apply_move(1, Player::Yellow).unwrap();
        let dump = grid.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[5], "# o            ");
        assert_eq!(lines[6], "0 1 2 3 4 5 6 ");
    }

    #[test]
    fn test_parse_round_trip() {
        let grid = fixture(DIAGONAL_UP);
        let reparsed: Grid = grid.to_string().parse().unwrap();
        assert_eq!(reparsed, grid);
        assert!(reparsed.is_finished());
    }

    #[test]
    fn test_parse_rejects_floating_token() {
        let dump = "              \n".repeat(4) + "#             \n" + "              \n";
        assert_eq!(
            dump.parse::<Grid>(),
            Err(GridParseError::Floating { row: 4, column: 0 })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "".parse::<Grid>(),
            Err(GridParseError::RowCount {
                expected: ROWS,
                found: 0
            })
        );
        let dump = "\n".repeat(ROWS - 1) + "x";
        assert_eq!(
            dump.parse::<Grid>(),
            Err(GridParseError::UnknownMarker {
                row: 5,
                column: 0,
                marker: 'x'
            })
        );
    }

    #[test]
    fn test_parse_rejects_compact_row() {
        let dump = "       \n".repeat(ROWS - 1) + "#o#o#o#\n";
        assert_eq!(
            dump.parse::<Grid>(),
            Err(GridParseError::RowLayout { row: ROWS - 1 })
        );
    }

    #[test]
    fn test_parse_rejects_overlong_row() {
        let dump = "              \n".repeat(ROWS - 1) + "# o # o # o #   #\n";
        assert_eq!(
            dump.parse::<Grid>(),
            Err(GridParseError::RowLayout { row: ROWS - 1 })
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_past_last_column_panics() {
        let mut grid = Grid::new();
        grid.apply_move(0, Player::Red).unwrap();
        grid.get(4, COLS);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_immediately_playable_past_last_column_panics() {
        Grid::new().is_immediately_playable(ROWS - 1, COLS);
    }
}
