//! Terminal UI: the name lobby, the game board with its status line, and
//! the win celebration overlay.

mod app;
pub mod board_widget;
mod celebration;
mod game_view;
mod lobby;
pub mod status;

pub use app::App;
pub use celebration::{Celebration, Sparkle};
pub use lobby::{LobbyAction, LobbyForm};
