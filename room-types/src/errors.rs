use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Everything that can go wrong while handling a player action. No
/// variant is process-fatal and every failure leaves room state
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("game is not active")]
    GameNotActive,
    #[error("game is not finished")]
    GameNotFinished,
    #[error("room is not full")]
    RoomNotFull,
    #[error("guess must be {expected} letters")]
    InvalidLength { expected: usize },
    #[error("word not in dictionary: {word}")]
    InvalidWord { word: String },
    #[error("no attempts left")]
    NoAttemptsLeft,
    #[error("player timed out")]
    PlayerTimedOut,
    #[error("no rematch request pending")]
    NoRematchRequest,
    #[error("cannot accept your own rematch request")]
    CannotAcceptOwnRequest,
    #[error("no words available of length {length}")]
    NoWordsForLength { length: usize },
}

impl GameError {
    /// Word errors are a distinct category so clients can prompt
    /// re-entry instead of treating the failure as fatal.
    pub fn is_word_error(&self) -> bool {
        matches!(
            self,
            GameError::InvalidLength { .. } | GameError::InvalidWord { .. }
        )
    }
}
