use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::game::{Player, PlayerNames};

const MAX_NAME_LEN: usize = 24;

/// What the lobby wants the app to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyAction {
    Continue,
    Start(PlayerNames),
    Quit,
}

/// Pre-game form collecting both display names.
#[derive(Debug, Clone, Default)]
pub struct LobbyForm {
    inputs: [String; 2],
    focus: usize,
}

impl LobbyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Player {
        if self.focus == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, defaults: &PlayerNames) -> LobbyAction {
        match key.code {
            KeyCode::Esc => return LobbyAction::Quit,
            KeyCode::Enter => {
                return LobbyAction::Start(PlayerNames::from_input(
                    &self.inputs[0],
                    &self.inputs[1],
                    defaults,
                ));
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = 1 - self.focus;
            }
            KeyCode::Backspace => {
                self.inputs[self.focus].pop();
            }
            KeyCode::Char(c) if !c.is_control() => {
                let input = &mut self.inputs[self.focus];
                if input.chars().count() < MAX_NAME_LEN {
                    input.push(c);
                }
            }
            _ => {}
        }
        LobbyAction::Continue
    }

    pub fn render(&self, frame: &mut Frame, defaults: &PlayerNames) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Player 1
                Constraint::Length(3), // Player 2
                Constraint::Min(0),
                Constraint::Length(3), // Controls
            ])
            .split(frame.area());

        let title = Paragraph::new("Enter player names")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Connect Four"));
        frame.render_widget(title, chunks[0]);

        self.render_input(frame, Player::One, defaults, chunks[1]);
        self.render_input(frame, Player::Two, defaults, chunks[2]);

        let controls = Paragraph::new("Tab: Switch field  |  Enter: Start  |  Esc: Quit")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        frame.render_widget(controls, chunks[4]);
    }

    fn render_input(&self, frame: &mut Frame, player: Player, defaults: &PlayerNames, area: Rect) {
        let focused = self.focused() == player;
        let value = &self.inputs[player.index()];
        let text = if value.is_empty() {
            Span::styled(defaults.get(player), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value.as_str())
        };
        let mut spans = vec![text];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }

        let border = if focused { Color::Cyan } else { Color::Reset };
        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!("Player {}", player.number())),
        );
        frame.render_widget(input, area);
    }
}
