use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::player::{GuessRecord, Player, PlayerId};
use crate::room::{RoomView, DEFAULT_TIME_LIMIT};

fn default_time_limit() -> Option<u32> {
    Some(DEFAULT_TIME_LIMIT)
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    CreateRoom {
        name: String,
        #[serde(default)]
        max_players: Option<usize>,
        #[serde(default)]
        word_length: Option<usize>,
        /// Omitted field defaults to 30 s; an explicit `null` asks for
        /// an unlimited clock.
        #[serde(default = "default_time_limit")]
        time_limit: Option<u32>,
    },
    JoinRoom {
        room_id: String,
        name: String,
    },
    MakeGuess {
        guess: String,
    },
    RequestRematch,
    AcceptRematch,
    DeclineRematch,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    RoomCreated { room_id: String },
    RoomJoined { state: RoomView },
    PlayerJoined { player: Player },
    GameStart { state: RoomView },
    UpdateState { state: RoomView },
    InvalidWord { message: String },
    TimerUpdate { remaining_time: u32 },
    PlayerTimeout { player_id: PlayerId },
    GameOver {
        state: RoomView,
        solution: String,
        winner: Option<PlayerId>,
    },
    RematchRequested { player_id: PlayerId, name: String },
    RematchAccepted,
    RematchCountdown { seconds: u32 },
    RematchDeclined,
    PlayerLeft { player_id: PlayerId, state: RoomView },
    Error { message: String },
}

/// Convenience for tests and handlers that only care about the most
/// recent guess in a state update.
impl ServerMessage {
    pub fn last_guess_of<'a>(&'a self, player_id: PlayerId) -> Option<&'a GuessRecord> {
        let state = match self {
            ServerMessage::UpdateState { state }
            | ServerMessage::GameStart { state }
            | ServerMessage::RoomJoined { state }
            | ServerMessage::GameOver { state, .. } => state,
            _ => return None,
        };
        state
            .players
            .iter()
            .find(|p| p.id == player_id)?
            .guesses
            .last()
    }
}
