//! UCI protocol errors.

/// Errors that can occur while handling UCI commands.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command lacks the `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// A FEN string in a `position` command failed to parse.
    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        /// The offending FEN string.
        fen: String,
        /// The underlying parse error.
        source: skewer_core::FenError,
    },

    /// A move string in a `position` command names no legal move.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The offending move string.
        uci_move: String,
    },

    /// A numeric argument could not be parsed.
    #[error("invalid {field}: \"{found}\"")]
    InvalidNumber {
        /// The argument name (e.g. "wtime", "depth").
        field: &'static str,
        /// The offending token, or empty if missing.
        found: String,
    },

    /// A `setoption` command is missing or naming an unknown option.
    #[error("invalid setoption command: {reason}")]
    InvalidOption {
        /// What went wrong.
        reason: String,
    },
}
