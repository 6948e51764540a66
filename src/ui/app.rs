use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::game::{GameSession, PlayerNames, COLS};
use crate::sync::{ExternalChange, SharedStore, SyncChannel};

use super::celebration::Celebration;
use super::lobby::{LobbyAction, LobbyForm};

enum Screen {
    Lobby(LobbyForm),
    Playing,
}

/// One game window: lobby, board, and the sync channel that mirrors the
/// session to other instances.
pub struct App<S> {
    channel: SyncChannel<S>,
    changes: mpsc::Receiver<ExternalChange>,
    default_names: PlayerNames,
    screen: Screen,
    session: GameSession,
    selected_column: usize,
    celebration: Option<Celebration>,
    poll_interval: Duration,
    celebration_duration: Duration,
    rng: StdRng,
    should_quit: bool,
}

impl<S: SharedStore> App<S> {
    /// The lobby is skipped when this game already has stored names.
    pub fn new(mut channel: SyncChannel<S>, default_names: PlayerNames, ui: &UiConfig) -> Self {
        let (tx, changes) = mpsc::channel();
        channel.subscribe(move |change| {
            tx.send(change.clone()).ok();
        });

        let mut app = App {
            session: channel.load(),
            channel,
            changes,
            default_names,
            screen: Screen::Lobby(LobbyForm::new()),
            selected_column: COLS / 2,
            celebration: None,
            poll_interval: Duration::from_millis(ui.poll_interval_ms),
            celebration_duration: Duration::from_millis(ui.celebration_ms),
            rng: StdRng::from_os_rng(),
            should_quit: false,
        };
        if app.channel.has_names() {
            info!(game = %app.channel.game_id(), "names already stored, skipping lobby");
            app.start_game(None);
        }
        app
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn in_lobby(&self) -> bool {
        matches!(self.screen, Screen::Lobby(_))
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration
            .as_ref()
            .is_some_and(|party| party.is_active(Instant::now()))
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal.draw(|f| self.render(f)).map_err(Into::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            self.tick();
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Pick up changes written by other instances and expire the celebration.
    pub fn tick(&mut self) {
        self.channel.pump();
        while let Ok(change) = self.changes.try_recv() {
            self.apply_external(change);
        }
        if self
            .celebration
            .as_ref()
            .is_some_and(|party| !party.is_active(Instant::now()))
        {
            self.celebration = None;
        }
    }

    fn apply_external(&mut self, change: ExternalChange) {
        debug!(over = change.session.is_over(), "external change observed");
        self.session = change.session;
        if change.celebrate {
            self.celebrate();
        }
        if self.in_lobby() && self.channel.has_names() {
            self.start_game(None);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Screen::Lobby(form) = &mut self.screen {
            match form.handle_key(key, &self.default_names) {
                LobbyAction::Continue => {}
                LobbyAction::Start(names) => self.start_game(Some(names)),
                LobbyAction::Quit => self.should_quit = true,
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.reset();
            }
            _ => {}
        }
    }

    /// Leave the lobby. Fresh names are stored first so other instances skip their lobby.
    fn start_game(&mut self, names: Option<PlayerNames>) {
        if let Some(names) = &names {
            self.channel.persist_names(names).ok();
        }
        let session = self.channel.initialize();
        self.session = match names {
            Some(names) => session.with_names(names),
            None => session,
        };
        self.screen = Screen::Playing;
    }

    /// Drop piece in selected column. Full columns and finished games are ignored.
    fn drop_piece(&mut self) {
        match self.session.apply_move(self.selected_column) {
            Ok(applied) => {
                self.session = applied.session;
                self.channel.persist(&self.session).ok();
                if applied.celebrate {
                    self.celebrate();
                }
            }
            Err(err) => {
                debug!(column = self.selected_column, %err, "move ignored");
            }
        }
    }

    fn reset(&mut self) {
        self.session = self.session.reset();
        self.selected_column = COLS / 2;
        self.celebration = None;
        self.channel.persist(&self.session).ok();
    }

    fn celebrate(&mut self) {
        self.celebration = Some(Celebration::new(
            &mut self.rng,
            Instant::now(),
            self.celebration_duration,
        ));
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        match &self.screen {
            Screen::Lobby(form) => form.render(frame, &self.default_names),
            Screen::Playing => {
                super::game_view::render(
                    frame,
                    &self.session,
                    self.selected_column,
                    self.channel.game_id(),
                );
                if let Some(party) = &self.celebration {
                    party.render(frame, Instant::now());
                }
            }
        }
    }
}
