use crate::game::{GameSession, Player};
use crate::sync::GameId;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget::render_board;
use super::status::status_line;

pub fn render(frame: &mut Frame, session: &GameSession, selected_column: usize, game_id: &GameId) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, game_id, chunks[0]);
    render_board(frame, session.board(), selected_column, chunks[1]);
    render_status(frame, session, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, session: &GameSession, game_id: &GameId, area: Rect) {
    let names = session.names();
    let title = format!(
        "{} vs {}  |  Game {}  |  join with {}",
        names.get(Player::One),
        names.get(Player::Two),
        game_id,
        game_id.share_query()
    );

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(player_color(session.current_player()))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_status(frame: &mut Frame, session: &GameSession, area: Rect) {
    let status = status_line(session);
    let style = if status.is_winner {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(player_color(session.current_player()))
    };

    let widget = Paragraph::new(status.text)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from("←/→: Move  |  1-7/Enter: Drop  |  R: Reset  |  Q: Quit");

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
