use std::path::PathBuf;

use crate::game::COLS;

/// Errors raised when a move cannot be placed on the grid. The grid is left
/// untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is out of range (expected 0..{max})", max = COLS)]
    InvalidColumn { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },
}

/// Errors raised by the match control loop when it refuses a human move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("the game is over")]
    GameOver,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Errors raised by the background search runner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    #[error("a search is already running")]
    Busy,
}

/// Errors raised while parsing a textual grid dump.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridParseError {
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("unknown marker {marker:?} at row {row}, column {column}")]
    UnknownMarker {
        row: usize,
        column: usize,
        marker: char,
    },

    #[error("row {row} is not a space-separated row of {max} markers", max = COLS)]
    RowLayout { row: usize },

    #[error("token at row {row}, column {column} is floating above an empty cell")]
    Floating { row: usize, column: usize },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
