use tracing::{debug, info};

use super::board::{Board, DropError, Placement, COLS};
use super::{Player, PlayerNames};

/// Prefix of the outcome message written when a player wins.
pub const WINNER_PREFIX: &str = "Winner: ";
pub const DRAW_MESSAGE: &str = "Draw!";

/// Where the game stands, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    AwaitingMove(Player),
    Won(Player),
    Drawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column is full")]
    ColumnFull,
    #[error("column is out of range")]
    InvalidColumn,
    #[error("game is already over")]
    GameAlreadyOver,
}

impl From<DropError> for MoveError {
    fn from(err: DropError) -> Self {
        match err {
            DropError::ColumnFull => MoveError::ColumnFull,
            DropError::InvalidColumn => MoveError::InvalidColumn,
        }
    }
}

/// The complete state shared between instances playing the same game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    current_player: Player,
    game_over: bool,
    message: String,
    names: PlayerNames,
}

/// Result of a legal move: the next session plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub session: GameSession,
    pub placed: Placement,
    /// Set when this move won the game.
    pub celebrate: bool,
}

impl GameSession {
    /// Create initial game session
    pub fn initial(names: PlayerNames) -> Self {
        GameSession {
            board: Board::new(),
            current_player: Player::One,
            game_over: false,
            message: String::new(),
            names,
        }
    }

    /// Reassemble a session from its stored parts.
    pub fn from_parts(
        board: Board,
        current_player: Player,
        game_over: bool,
        message: String,
        names: PlayerNames,
    ) -> Self {
        GameSession {
            board,
            current_player,
            game_over,
            message,
            names,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Outcome message; empty while the game is running.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn names(&self) -> &PlayerNames {
        &self.names
    }

    /// Same game with different display names. Board and turn are kept.
    pub fn with_names(&self, names: PlayerNames) -> Self {
        GameSession {
            names,
            ..self.clone()
        }
    }

    /// The turn does not advance on a winning move, so the current player is the winner.
    pub fn status(&self) -> GameStatus {
        if !self.game_over {
            GameStatus::AwaitingMove(self.current_player)
        } else if self.message.starts_with(WINNER_PREFIX) {
            GameStatus::Won(self.current_player)
        } else {
            GameStatus::Drawn
        }
    }

    pub fn is_won(&self) -> bool {
        matches!(self.status(), GameStatus::Won(_))
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.game_over {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| !self.board.is_column_full(col))
            .collect()
    }

    /// Drop the current player's piece in `column` and return the next session.
    ///
    /// A win ends the game and keeps the turn on the winner; otherwise a full
    /// board is a draw; otherwise the turn passes and the message is cleared.
    pub fn apply_move(&self, column: usize) -> Result<AppliedMove, MoveError> {
        if self.game_over {
            return Err(MoveError::GameAlreadyOver);
        }

        let player = self.current_player;
        let mut next = self.clone();
        let placed = next.board.drop_piece(column, player.to_cell())?;
        debug!(player = player.number(), row = placed.row, col = placed.col, "piece dropped");

        let celebrate = if next.board.check_win(placed.row, placed.col) {
            next.message = format!("{WINNER_PREFIX}{}", self.names.get(player));
            next.game_over = true;
            info!(winner = self.names.get(player), "game won");
            true
        } else if next.board.is_draw() {
            next.message = DRAW_MESSAGE.to_string();
            next.game_over = true;
            info!("game drawn");
            false
        } else {
            next.current_player = player.other();
            next.message.clear();
            false
        };

        Ok(AppliedMove {
            session: next,
            placed,
            celebrate,
        })
    }

    /// Fresh board with player one to move. Names are kept.
    pub fn reset(&self) -> Self {
        info!("game reset");
        GameSession::initial(self.names.clone())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::initial(PlayerNames::default())
    }
}
