//! Stored representation of a game session.
//!
//! | key                       | value                                   |
//! |---------------------------|-----------------------------------------|
//! | `connect4-board-{id}`     | JSON array of 6 rows of 7 ints in 0..=2 |
//! | `connect4-turn-{id}`      | `1` or `2`                              |
//! | `connect4-over-{id}`      | `1` or `0`                              |
//! | `connect4-message-{id}`   | outcome message, empty while playing    |
//! | `connect4-names-{id}`     | JSON array of two strings               |

use serde_json::json;

use crate::error::DecodeError;
use crate::game::{Board, Cell, Player, PlayerNames, COLS, ROWS};

use super::GameId;

const KEY_PREFIX: &str = "connect4";

/// Store keys for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKeys {
    pub board: String,
    pub turn: String,
    pub over: String,
    pub message: String,
    pub names: String,
}

impl StateKeys {
    pub fn for_game(game_id: &GameId) -> Self {
        let key = |field: &str| format!("{KEY_PREFIX}-{field}-{game_id}");
        StateKeys {
            board: key("board"),
            turn: key("turn"),
            over: key("over"),
            message: key("message"),
            names: key("names"),
        }
    }

    pub fn all(&self) -> [&str; 5] {
        [
            self.board.as_str(),
            self.turn.as_str(),
            self.over.as_str(),
            self.message.as_str(),
            self.names.as_str(),
        ]
    }

    /// True if `key` belongs to this game.
    pub fn contains(&self, key: &str) -> bool {
        self.all().contains(&key)
    }
}

pub fn encode_board(board: &Board) -> String {
    let rows: Vec<Vec<u8>> = board
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.code()).collect())
        .collect();
    json!(rows).to_string()
}

pub fn decode_board(raw: &str) -> Result<Board, DecodeError> {
    let rows: Vec<Vec<u8>> = serde_json::from_str(raw).map_err(|source| DecodeError::Json {
        key: "board".to_string(),
        source,
    })?;
    if rows.len() != ROWS || rows.iter().any(|row| row.len() != COLS) {
        return Err(DecodeError::BoardShape {
            expected_rows: ROWS,
            expected_cols: COLS,
        });
    }

    let mut cells = [[Cell::Empty; COLS]; ROWS];
    for (target, source) in cells.iter_mut().zip(&rows) {
        for (cell, &code) in target.iter_mut().zip(source) {
            *cell = Cell::from_code(code).ok_or(DecodeError::BoardCell(code))?;
        }
    }

    let board = Board::from_cells(cells);
    if !board.is_settled() {
        return Err(DecodeError::FloatingPiece);
    }
    Ok(board)
}

pub fn encode_turn(player: Player) -> String {
    player.number().to_string()
}

pub fn decode_turn(raw: &str) -> Result<Player, DecodeError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(Player::from_number)
        .ok_or_else(|| DecodeError::Turn(raw.to_string()))
}

pub fn encode_over(over: bool) -> String {
    let flag = if over { "1" } else { "0" };
    flag.to_string()
}

/// Anything but `"1"` means the game is still running.
pub fn decode_over(raw: &str) -> bool {
    raw == "1"
}

pub fn encode_names(names: &PlayerNames) -> String {
    json!(names.as_array()).to_string()
}

pub fn decode_names(raw: &str) -> Result<PlayerNames, DecodeError> {
    let names: [String; 2] = serde_json::from_str(raw).map_err(|source| DecodeError::Json {
        key: "names".to_string(),
        source,
    })?;
    Ok(PlayerNames::from(names))
}
