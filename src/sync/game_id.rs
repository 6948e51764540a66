use std::fmt;

use percent_encoding::percent_decode_str;
use rand::Rng;

use crate::error::GameIdError;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque token naming one game inside a shared store.
///
/// Ids end up in store keys and file names, so only `[A-Za-z0-9_-]` is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub const GENERATED_LEN: usize = 8;
    pub const MAX_LEN: usize = 64;

    pub fn parse(raw: &str) -> Result<Self, GameIdError> {
        if raw.is_empty() {
            return Err(GameIdError::Empty);
        }
        if raw.len() > Self::MAX_LEN {
            return Err(GameIdError::TooLong { max: Self::MAX_LEN });
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GameIdError::InvalidChars(raw.to_string()));
        }
        Ok(GameId(raw.to_string()))
    }

    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let id = (0..Self::GENERATED_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        GameId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Query string that lets another instance join this game.
    pub fn share_query(&self) -> String {
        format!("?game={}", self.0)
    }

    /// Extract the id from a link.
    ///
    /// Accepts a full URL (`http://host/?game=abc`), a bare query
    /// (`?game=abc` or `game=abc&x=1`) or the id itself. Query values are
    /// form-decoded (`%2D`, `+`). Returns `None` when a URL or query carries
    /// no `game` parameter or an empty one.
    pub fn from_link(link: &str) -> Result<Option<Self>, GameIdError> {
        let link = link.trim();
        let link = link.split('#').next().unwrap_or_default();
        let query = match link.split_once('?') {
            Some((_, query)) => query,
            None if link.contains('=') => link,
            None if link.is_empty() || link.contains('/') => return Ok(None),
            None => return GameId::parse(link).map(Some),
        };

        match query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "game")
        {
            Some((_, value)) if !value.is_empty() => {
                let spaced = value.replace('+', " ");
                let decoded = percent_decode_str(&spaced)
                    .decode_utf8()
                    .map_err(|_| GameIdError::InvalidChars(value.to_string()))?;
                GameId::parse(&decoded).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The game id an instance was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub game_id: GameId,
    /// True when no id was supplied and a fresh one was made up.
    pub generated: bool,
}

impl Invocation {
    /// Resolve the game from an optional link, generating an id if the link has none.
    pub fn resolve<R: Rng>(link: Option<&str>, rng: &mut R) -> Result<Self, GameIdError> {
        let supplied = match link {
            Some(link) => GameId::from_link(link)?,
            None => None,
        };
        Ok(match supplied {
            Some(game_id) => Invocation {
                game_id,
                generated: false,
            },
            None => Invocation {
                game_id: GameId::generate(rng),
                generated: true,
            },
        })
    }
}
