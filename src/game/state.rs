use super::{Grid, Player};

/// Where a human-versus-computer match stands after the latest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    HumanTurn,
    Thinking,
    Won(Player),
    Draw,
}

impl GameStatus {
    /// Status of `grid` once the last move is on it and `next` is due to play.
    pub fn after_move(grid: &Grid, next: Player, human: Player) -> GameStatus {
        if let Some(winner) = Player::from_cell(grid.winner()) {
            GameStatus::Won(winner)
        } else if grid.is_finished() {
            GameStatus::Draw
        } else if next == human {
            GameStatus::HumanTurn
        } else {
            GameStatus::Thinking
        }
    }

    /// Check if the game is over
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Won(_) | GameStatus::Draw)
    }

    /// Player-facing status line.
    pub fn message(self, human: Player) -> &'static str {
        match self {
            GameStatus::HumanTurn => "It's your turn!",
            GameStatus::Thinking => "The computer is thinking...",
            GameStatus::Won(winner) if winner == human => "Congratulations! You've won!",
            GameStatus::Won(_) => "Ow! The computer has won!",
            GameStatus::Draw => "Oops! That's a draw!",
        }
    }
}
