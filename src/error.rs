use std::path::PathBuf;

/// Errors raised by a shared store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read key '{key}' from {path}: {source}")]
    Read {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write key '{key}' to {path}: {source}")]
    Write {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan store directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

/// A stored value that could not be turned back into game state.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON in '{key}': {source}")]
    Json {
        key: String,
        source: serde_json::Error,
    },

    #[error("board must have {expected_rows} rows of {expected_cols} cells")]
    BoardShape {
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("board cell value {0} is not 0, 1 or 2")]
    BoardCell(u8),

    #[error("board has a piece above an empty cell")]
    FloatingPiece,

    #[error("turn '{0}' is not 1 or 2")]
    Turn(String),
}

/// Errors for game identifiers taken from the invocation context.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameIdError {
    #[error("game id is empty")]
    Empty,

    #[error("game id is longer than {max} characters")]
    TooLong { max: usize },

    #[error("game id '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidChars(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("quota exceeded".to_string());
        assert_eq!(err.to_string(), "store is unavailable: quota exceeded");
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::BoardShape {
            expected_rows: 6,
            expected_cols: 7,
        };
        assert_eq!(err.to_string(), "board must have 6 rows of 7 cells");
        assert_eq!(
            DecodeError::Turn("3".to_string()).to_string(),
            "turn '3' is not 1 or 2"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("ui.poll_interval_ms must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: ui.poll_interval_ms must be > 0"
        );
    }
}
