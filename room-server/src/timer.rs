use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use room_types::{Player, PlayerId};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::orchestrator::GameOrchestrator;

struct TimerHandle {
    task: JoinHandle<()>,
    generation: u64,
}

/// Owns at most one countdown task per (room, player). Every restart
/// cancels the previous handle first, and every tick carries the
/// generation it was scheduled under so a tick that raced a
/// cancellation can be discarded by the orchestrator.
#[derive(Default)]
pub struct TimerManager {
    handles: HashMap<(String, PlayerId), TimerHandle>,
    next_generation: u64,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)start the countdown for one player. No-op for a timed-out
    /// player; an unlimited room just gets the sentinel and no task.
    pub fn start(
        &mut self,
        orchestrator: &Arc<GameOrchestrator>,
        room_id: &str,
        player: &mut Player,
        limit: Option<u32>,
    ) {
        if player.timed_out {
            return;
        }
        self.stop(room_id, player.id);
        player.remaining_time = limit;
        if limit.is_none() {
            return;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let orch = Arc::clone(orchestrator);
        let room = room_id.to_string();
        let player_id = player.id;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a fresh interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                orch.handle_tick(&room, player_id, generation).await;
            }
        });

        self.handles
            .insert((room_id.to_string(), player.id), TimerHandle { task, generation });
    }

    /// Generation of the live timer for this pair, if any.
    pub fn generation(&self, room_id: &str, player_id: PlayerId) -> Option<u64> {
        self.handles
            .get(&(room_id.to_string(), player_id))
            .map(|h| h.generation)
    }

    /// Cancel and discard the handle if present; idempotent.
    pub fn stop(&mut self, room_id: &str, player_id: PlayerId) {
        if let Some(handle) = self.handles.remove(&(room_id.to_string(), player_id)) {
            handle.task.abort();
            debug!(room_id, %player_id, "timer stopped");
        }
    }

    /// Cancel every timer owned by a room.
    pub fn stop_all(&mut self, room_id: &str) {
        self.handles.retain(|(room, _), handle| {
            if room == room_id {
                handle.task.abort();
                false
            } else {
                true
            }
        });
    }

    pub fn active_count(&self) -> usize {
        self.handles.len()
    }
}
