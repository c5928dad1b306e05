use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::player::Player;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;
pub const DEFAULT_WORD_LENGTH: usize = 5;
pub const DEFAULT_TIME_LIMIT: u32 = 30;

/// Word lengths a room may be configured with.
pub const ALLOWED_WORD_LENGTHS: [usize; 3] = [5, 6, 7];
/// Per-guess time limits a room may be configured with (seconds).
pub const ALLOWED_TIME_LIMITS: [u32; 5] = [30, 35, 60, 75, 90];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomConfig {
    pub max_players: usize,
    pub word_length: usize,
    /// `None` means no per-guess clock.
    pub time_limit: Option<u32>,
}

impl RoomConfig {
    /// Build a config from raw client input. Out-of-range values are
    /// clamped or defaulted, never rejected.
    pub fn sanitize(
        max_players: Option<usize>,
        word_length: Option<usize>,
        time_limit: Option<u32>,
    ) -> Self {
        let max_players = max_players
            .unwrap_or(MIN_PLAYERS)
            .clamp(MIN_PLAYERS, MAX_PLAYERS);
        let word_length = match word_length {
            Some(len) if ALLOWED_WORD_LENGTHS.contains(&len) => len,
            _ => DEFAULT_WORD_LENGTH,
        };
        let time_limit = match time_limit {
            None => None,
            Some(secs) if ALLOWED_TIME_LIMITS.contains(&secs) => Some(secs),
            Some(_) => Some(DEFAULT_TIME_LIMIT),
        };
        Self {
            max_players,
            word_length,
            time_limit,
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: MIN_PLAYERS,
            word_length: DEFAULT_WORD_LENGTH,
            time_limit: Some(DEFAULT_TIME_LIMIT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterStatus {
    Correct,
    Present,
    Absent,
}

/// Client-facing projection of a room. The solution is never part of
/// this view; it is revealed only inside `ServerMessage::GameOver`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomView {
    pub id: String,
    pub status: RoomStatus,
    pub config: RoomConfig,
    pub players: Vec<Player>,
    pub created_at: String, // ISO 8601 string
}
