use tracing::{debug, info, warn};

use crate::error::{DecodeError, StoreError};
use crate::game::{Board, GameSession, Player, PlayerNames};

use super::codec::{self, StateKeys};
use super::{GameId, SharedStore};

/// A session written by another instance, as observed after reloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalChange {
    pub session: GameSession,
    /// The reloaded session is won and no win was observed before it.
    pub celebrate: bool,
}

type ChangeHandler = Box<dyn FnMut(&ExternalChange)>;

/// Persists and reloads one game's session through a [`SharedStore`], and
/// tells subscribers when another instance changed it.
///
/// Last writer wins: nothing here detects or resolves two instances
/// writing the same game at the same time.
pub struct SyncChannel<S> {
    store: S,
    game_id: GameId,
    keys: StateKeys,
    default_names: PlayerNames,
    handlers: Vec<ChangeHandler>,
    observed_win: bool,
}

impl<S: SharedStore> SyncChannel<S> {
    pub fn new(store: S, game_id: GameId, default_names: PlayerNames) -> Self {
        let keys = StateKeys::for_game(&game_id);
        SyncChannel {
            store,
            game_id,
            keys,
            default_names,
            handlers: Vec::new(),
            observed_win: false,
        }
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write board, turn, over flag and message. Names are written separately
    /// by [`SyncChannel::persist_names`].
    ///
    /// Every key is attempted; the first failure is returned. The in-memory
    /// session stays authoritative either way.
    pub fn persist(&mut self, session: &GameSession) -> Result<(), StoreError> {
        self.observed_win = session.is_won();
        let writes = [
            (&self.keys.board, codec::encode_board(session.board())),
            (&self.keys.turn, codec::encode_turn(session.current_player())),
            (&self.keys.over, codec::encode_over(session.is_over())),
            (&self.keys.message, session.message().to_string()),
        ];

        let mut first_err = None;
        for (key, value) in writes {
            if let Err(err) = self.store.write(key, &value) {
                warn!(game = %self.game_id, error = %err, "failed to persist state");
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn persist_names(&mut self, names: &PlayerNames) -> Result<(), StoreError> {
        let result = self
            .store
            .write(&self.keys.names, &codec::encode_names(names));
        if let Err(err) = &result {
            warn!(game = %self.game_id, error = %err, "failed to persist player names");
        }
        result
    }

    /// Read the stored session. Missing keys take their initial values and
    /// malformed ones are logged and replaced by defaults.
    pub fn load(&self) -> GameSession {
        let board = self
            .read_decoded(&self.keys.board, codec::decode_board)
            .unwrap_or_else(Board::new);
        let current_player = self
            .read_decoded(&self.keys.turn, codec::decode_turn)
            .unwrap_or(Player::One);
        let game_over = self
            .read_raw(&self.keys.over)
            .map(|raw| codec::decode_over(&raw))
            .unwrap_or(false);
        let message = self.read_raw(&self.keys.message).unwrap_or_default();

        GameSession::from_parts(board, current_player, game_over, message, self.load_names())
    }

    pub fn load_names(&self) -> PlayerNames {
        self.read_decoded(&self.keys.names, codec::decode_names)
            .unwrap_or_else(|| self.default_names.clone())
    }

    pub fn has_board(&self) -> bool {
        self.read_raw(&self.keys.board).is_some()
    }

    /// Names are stored once the lobby has been completed for this game.
    pub fn has_names(&self) -> bool {
        self.read_raw(&self.keys.names).is_some()
    }

    /// Load the session, writing the initial state if this game has no board yet.
    pub fn initialize(&mut self) -> GameSession {
        let session = self.load();
        if !self.has_board() {
            info!(game = %self.game_id, "starting new game");
            self.persist(&session).ok();
        }
        self.observed_win = session.is_won();
        session
    }

    /// Register a handler run after each reload caused by another instance.
    pub fn subscribe(&mut self, handler: impl FnMut(&ExternalChange) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Drain external changes to this game. If there were any, reload once
    /// and run every handler once. Returns whether handlers ran.
    pub fn pump(&mut self) -> bool {
        let changed = match self.store.external_changes(&self.keys.all()) {
            Ok(keys) => keys,
            Err(err) => {
                warn!(game = %self.game_id, error = %err, "failed to poll store");
                return false;
            }
        };
        if changed.is_empty() {
            return false;
        }

        let session = self.load();
        let celebrate = session.is_won() && !self.observed_win;
        self.observed_win = session.is_won();
        debug!(game = %self.game_id, keys = changed.len(), celebrate, "reloaded after external change");

        let change = ExternalChange { session, celebrate };
        for handler in &mut self.handlers {
            handler(&change);
        }
        true
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.read(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(game = %self.game_id, error = %err, "failed to read state");
                None
            }
        }
    }

    fn read_decoded<T>(&self, key: &str, decode: fn(&str) -> Result<T, DecodeError>) -> Option<T> {
        let raw = self.read_raw(key)?;
        match decode(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(game = %self.game_id, key, error = %err, "ignoring malformed stored value");
                None
            }
        }
    }
}
