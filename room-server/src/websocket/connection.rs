use std::collections::HashMap;
use std::sync::RwLock;

use room_types::{PlayerId, ServerMessage};
use tokio::sync::mpsc;
use tracing::warn;

/// Maps player ids (one per live connection) to their outbound message
/// channels. The WebSocket task drains the receiver; everyone else
/// just pushes messages here.
#[derive(Default)]
pub struct ConnectionManager {
    senders: RwLock<HashMap<PlayerId, mpsc::UnboundedSender<ServerMessage>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player_id: PlayerId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders
            .write()
            .expect("connection map poisoned")
            .insert(player_id, sender);
        receiver
    }

    pub fn remove(&self, player_id: PlayerId) {
        self.senders
            .write()
            .expect("connection map poisoned")
            .remove(&player_id);
    }

    pub fn send_to(&self, player_id: PlayerId, message: ServerMessage) {
        let senders = self.senders.read().expect("connection map poisoned");
        if let Some(sender) = senders.get(&player_id) {
            if sender.send(message).is_err() {
                warn!(%player_id, "dropping message for closed connection");
            }
        }
    }

    pub fn broadcast(&self, recipients: &[PlayerId], message: ServerMessage) {
        for player_id in recipients {
            self.send_to(*player_id, message.clone());
        }
    }

    pub fn count(&self) -> usize {
        self.senders.read().expect("connection map poisoned").len()
    }
}
