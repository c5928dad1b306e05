use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::room::LetterStatus;

pub type PlayerId = Uuid;

/// Maximum number of guesses a player gets per game.
pub const MAX_GUESSES: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub guesses: Vec<GuessRecord>,
    /// Seconds left on this player's clock; `None` means unlimited.
    pub remaining_time: Option<u32>,
    pub ready: bool,
    pub timed_out: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, remaining_time: Option<u32>) -> Self {
        Self {
            id,
            name,
            guesses: Vec::new(),
            remaining_time,
            ready: true,
            timed_out: false,
        }
    }

    pub fn attempts_left(&self) -> bool {
        self.guesses.len() < MAX_GUESSES
    }

    /// True once the player can no longer act this game.
    pub fn is_done(&self) -> bool {
        self.timed_out || !self.attempts_left()
    }

    pub fn has_solved(&self) -> bool {
        self.guesses
            .last()
            .is_some_and(|g| g.feedback.iter().all(|s| *s == LetterStatus::Correct))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub word: String,
    pub feedback: Vec<LetterStatus>,
    pub timestamp: String, // ISO 8601 string
}
