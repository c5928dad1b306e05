use std::collections::HashMap;

use rand::prelude::*;
use room_types::{Player, PlayerId, RoomConfig};
use tracing::info;

use crate::room::GameRoom;

const ROOM_ID_LEN: usize = 6;
const ROOM_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Owns every active [`GameRoom`]. Deletion is the only mutation the
/// registry performs itself; everything else goes through the room
/// returned by the lookup methods.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, GameRoom>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room in `Waiting` state with its first player and a
    /// pre-drawn solution. Returns the new room id.
    pub fn create(&mut self, config: RoomConfig, first_player: Player, solution: String) -> String {
        let room_id = self.generate_room_id();
        let mut room = GameRoom::new(room_id.clone(), config, solution);
        room.players.push(first_player);
        info!(room_id = %room_id, max_players = config.max_players, "room created");
        self.rooms.insert(room_id.clone(), room);
        room_id
    }

    pub fn find(&self, room_id: &str) -> Option<&GameRoom> {
        self.rooms.get(room_id)
    }

    pub fn find_mut(&mut self, room_id: &str) -> Option<&mut GameRoom> {
        self.rooms.get_mut(room_id)
    }

    /// Linear scan across rooms; fine at the expected scale.
    pub fn find_by_player(&self, player_id: PlayerId) -> Option<&GameRoom> {
        self.rooms.values().find(|r| r.contains_player(player_id))
    }

    pub fn find_by_player_mut(&mut self, player_id: PlayerId) -> Option<&mut GameRoom> {
        self.rooms
            .values_mut()
            .find(|r| r.contains_player(player_id))
    }

    pub fn remove(&mut self, room_id: &str) -> Option<GameRoom> {
        let removed = self.rooms.remove(room_id);
        if removed.is_some() {
            info!(room_id = %room_id, "room removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Short shareable code, re-rolled until unused among active rooms.
    fn generate_room_id(&self) -> String {
        let mut rng = rand::rng();
        loop {
            let id: String = (0..ROOM_ID_LEN)
                .map(|_| ROOM_ID_CHARSET[rng.random_range(0..ROOM_ID_CHARSET.len())] as char)
                .collect();
            if !self.rooms.contains_key(&id) {
                return id;
            }
        }
    }
}
