use crate::game::{GameSession, WINNER_PREFIX};

/// Text shown under the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    /// Winner messages are drawn highlighted.
    pub is_winner: bool,
}

/// An explicit outcome message wins; otherwise it is whose turn it is.
pub fn status_line(session: &GameSession) -> StatusLine {
    let message = session.message();
    if !message.is_empty() {
        return StatusLine {
            text: message.to_string(),
            is_winner: message.starts_with(WINNER_PREFIX),
        };
    }

    let text = if session.is_over() {
        "Game over".to_string()
    } else {
        format!("{}'s turn", session.names().get(session.current_player()))
    };
    StatusLine {
        text,
        is_winner: false,
    }
}
