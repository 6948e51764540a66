//! Core Connect Four game logic: board, players and the shared game session
//! with its move/reset transitions.

mod board;
mod player;
mod session;

pub use board::{Board, Cell, DropError, Placement, COLS, CONNECT, ROWS};
pub use player::{Player, PlayerNames};
pub use session::{AppliedMove, GameSession, GameStatus, MoveError, DRAW_MESSAGE, WINNER_PREFIX};
