use std::sync::Arc;

use tracing::{info, instrument};

use crate::ai::{LineHeuristic, RunnerPhase, SearchRunner, Searcher};
use crate::config::AppConfig;
use crate::error::{MoveError, PlayError};
use crate::game::{GameStatus, Grid, Player};

/// A human-versus-computer match.
///
/// Owns the authoritative grid. The grid only changes inside
/// [`submit_move`](App::submit_move) and [`tick`](App::tick), never while the
/// computer's search is running, and the search only ever sees a copy.
pub struct App {
    grid: Grid,
    human: Player,
    human_starts: bool,
    turn: Player,
    max_depth: usize,
    runner: SearchRunner,
    status: GameStatus,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let heuristic = LineHeuristic::new(config.search.line_scoring);
        let searcher = Searcher::new(Arc::new(heuristic));
        let mut app = App {
            grid: Grid::new(),
            human: config.game.human,
            human_starts: config.game.human_starts,
            turn: config.game.human,
            max_depth: config.search.max_depth,
            runner: SearchRunner::new(searcher, config.search.min_think()),
            status: GameStatus::HumanTurn,
        };
        app.begin();
        app
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn computer(&self) -> Player {
        self.human.other()
    }

    /// Player-facing line for the current status.
    pub fn message(&self) -> &'static str {
        self.status.message(self.human)
    }

    /// Play the human's move and hand the turn to the computer.
    #[instrument(skip(self))]
    pub fn submit_move(&mut self, column: usize) -> Result<GameStatus, PlayError> {
        if self.status.is_over() {
            return Err(PlayError::GameOver);
        }
        if self.turn != self.human {
            return Err(PlayError::NotYourTurn);
        }
        Ok(self.play(column)?)
    }

    /// Poll the computer's search once. Returns the new status when the
    /// computer has moved, `None` otherwise.
    pub fn tick(&mut self) -> Option<GameStatus> {
        if self.status != GameStatus::Thinking {
            return None;
        }
        if !self.runner.poll() {
            assert!(
                self.runner.phase() != RunnerPhase::Aborted,
                "computer search ended without a result"
            );
            return None;
        }

        let result = self.runner.result()?;
        let Some(column) = result.column else {
            // Only reachable on a full grid, which is already a draw.
            self.status = GameStatus::Draw;
            return Some(self.status);
        };
        let status = self
            .play(column)
            .unwrap_or_else(|err| panic!("search chose unplayable column {column}: {err}"));
        Some(status)
    }

    /// Abandon the current game, including any search in flight, and start over.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.runner.abort();
        self.grid.reset();
        info!("new game");
        self.begin();
    }

    fn begin(&mut self) {
        self.turn = if self.human_starts {
            self.human
        } else {
            self.computer()
        };
        self.status = GameStatus::HumanTurn;
        if self.turn != self.human {
            self.launch_search();
        }
    }

    fn play(&mut self, column: usize) -> Result<GameStatus, MoveError> {
        let player = self.turn;
        let row = self.grid.apply_move(column, player)?;
        info!(player = player.name(), column, row, "move played");

        self.turn = player.other();
        self.status = GameStatus::after_move(&self.grid, self.turn, self.human);
        match self.status {
            GameStatus::Won(winner) => info!(winner = winner.name(), "game won"),
            GameStatus::Draw => info!("game drawn"),
            GameStatus::Thinking => self.launch_search(),
            GameStatus::HumanTurn => {}
        }
        Ok(self.status)
    }

    fn launch_search(&mut self) {
        self.status = GameStatus::Thinking;
        self.runner
            .start(&self.grid, self.computer(), self.max_depth)
            .unwrap_or_else(|err| panic!("computer search launched twice: {err}"));
    }
}
