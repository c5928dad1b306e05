use std::sync::Arc;
use std::time::Duration;

use room_core::{evaluate_guess, GameOutcome, RematchRequest, RoomRegistry, WordRepository};
use room_types::{
    GameError, GuessRecord, LetterStatus, Player, PlayerId, RoomConfig, RoomStatus, ServerMessage,
};
use tokio::sync::Mutex;
use tracing::info;

use crate::timer::TimerManager;
use crate::websocket::connection::ConnectionManager;

/// Finished rooms linger this long so clients can show the result.
const ROOM_CLEANUP_GRACE: Duration = Duration::from_secs(300);
const REMATCH_COUNTDOWN_SECS: u32 = 3;

struct OrchestratorState {
    registry: RoomRegistry,
    timers: TimerManager,
}

/// Drives the room lifecycle: player actions and timer ticks come in,
/// scoped notifications go out. A single mutex over registry and
/// timers serializes every handler, so each action or tick runs to
/// completion against current state before the next is processed.
pub struct GameOrchestrator {
    state: Mutex<OrchestratorState>,
    words: Arc<WordRepository>,
    connections: Arc<ConnectionManager>,
}

impl GameOrchestrator {
    pub fn new(words: Arc<WordRepository>, connections: Arc<ConnectionManager>) -> Self {
        Self {
            state: Mutex::new(OrchestratorState {
                registry: RoomRegistry::new(),
                timers: TimerManager::new(),
            }),
            words,
            connections,
        }
    }

    pub async fn active_rooms(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// Swap a room's hidden solution. Debug/test hook; the word should
    /// match the room's configured length.
    #[doc(hidden)]
    pub async fn override_solution(&self, room_id: &str, solution: &str) -> bool {
        let mut state = self.state.lock().await;
        match state.registry.find_mut(room_id) {
            Some(room) => {
                room.solution = room_core::normalize(solution);
                true
            }
            None => false,
        }
    }

    pub async fn create_room(
        &self,
        player_id: PlayerId,
        name: String,
        max_players: Option<usize>,
        word_length: Option<usize>,
        time_limit: Option<u32>,
    ) -> Result<(), GameError> {
        let config = RoomConfig::sanitize(max_players, word_length, time_limit);
        // A missing word list is the one failure that aborts creation.
        let solution = self.words.random_solution(config.word_length)?;

        let mut state = self.state.lock().await;
        let player = Player::new(player_id, name, config.time_limit);
        let room_id = state.registry.create(config, player, solution);
        self.connections
            .send_to(player_id, ServerMessage::RoomCreated { room_id });
        Ok(())
    }

    pub async fn join_room(
        self: &Arc<Self>,
        player_id: PlayerId,
        room_id: &str,
        name: String,
    ) -> Result<(), GameError> {
        let mut state = self.state.lock().await;
        let OrchestratorState { registry, timers } = &mut *state;
        let room = registry.find_mut(room_id).ok_or(GameError::RoomNotFound)?;

        if room.contains_player(player_id) {
            // Reconnection: just re-send the current state.
            self.connections
                .send_to(player_id, ServerMessage::RoomJoined { state: room.view() });
            return Ok(());
        }
        if room.is_full() {
            return Err(GameError::RoomFull);
        }
        if room.status != RoomStatus::Waiting {
            return Err(GameError::GameAlreadyStarted);
        }

        let player = Player::new(player_id, name, room.config.time_limit);
        room.players.push(player.clone());
        info!(room_id, %player_id, players = room.players.len(), "player joined");

        self.connections
            .send_to(player_id, ServerMessage::RoomJoined { state: room.view() });
        self.connections.broadcast(
            &room.other_player_ids(player_id),
            ServerMessage::PlayerJoined { player },
        );

        if room.is_full() {
            room.status = RoomStatus::Playing;
            info!(room_id, "room full, game starting");
            let limit = room.config.time_limit;
            let rid = room.id.clone();
            for member in &mut room.players {
                timers.start(self, &rid, member, limit);
            }
            self.connections.broadcast(
                &room.player_ids(),
                ServerMessage::GameStart { state: room.view() },
            );
        }
        Ok(())
    }

    pub async fn make_guess(
        self: &Arc<Self>,
        player_id: PlayerId,
        guess: &str,
    ) -> Result<(), GameError> {
        let mut state = self.state.lock().await;
        let OrchestratorState { registry, timers } = &mut *state;
        let room = registry
            .find_by_player_mut(player_id)
            .ok_or(GameError::RoomNotFound)?;
        if room.status != RoomStatus::Playing {
            return Err(GameError::GameNotActive);
        }
        if guess.chars().count() != room.config.word_length {
            return Err(GameError::InvalidLength {
                expected: room.config.word_length,
            });
        }
        if !self.words.is_valid_guess(guess) {
            return Err(GameError::InvalidWord {
                word: guess.to_string(),
            });
        }

        let room_id = room.id.clone();
        let solution = room.solution.clone();
        let limit = room.config.time_limit;
        let player = room
            .player_mut(player_id)
            .ok_or(GameError::RoomNotFound)?;
        if !player.attempts_left() {
            return Err(GameError::NoAttemptsLeft);
        }
        if player.timed_out {
            return Err(GameError::PlayerTimedOut);
        }

        let feedback = evaluate_guess(guess, &solution);
        let solved = feedback.iter().all(|s| *s == LetterStatus::Correct);
        player.guesses.push(GuessRecord {
            word: guess.to_string(),
            feedback,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });

        if solved {
            // The game is ending; stop the clock instead of resetting it.
            timers.stop(&room_id, player_id);
        } else {
            timers.start(self, &room_id, player, limit);
        }

        match room.outcome() {
            Some(outcome) => self.finish_game(registry, timers, &room_id, outcome),
            None => self.connections.broadcast(
                &room.player_ids(),
                ServerMessage::UpdateState { state: room.view() },
            ),
        }
        Ok(())
    }

    pub async fn request_rematch(&self, player_id: PlayerId) -> Result<(), GameError> {
        let mut state = self.state.lock().await;
        let room = state
            .registry
            .find_by_player_mut(player_id)
            .ok_or(GameError::RoomNotFound)?;
        if room.status != RoomStatus::Finished {
            return Err(GameError::GameNotFinished);
        }
        if !room.is_full() {
            return Err(GameError::RoomNotFull);
        }

        room.rematch = Some(RematchRequest {
            requested_by: player_id,
            accepted: false,
        });
        let name = room
            .player(player_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        info!(room_id = %room.id, %player_id, "rematch requested");
        self.connections.broadcast(
            &room.other_player_ids(player_id),
            ServerMessage::RematchRequested { player_id, name },
        );
        Ok(())
    }

    pub async fn accept_rematch(self: &Arc<Self>, player_id: PlayerId) -> Result<(), GameError> {
        let mut state = self.state.lock().await;
        let room = state
            .registry
            .find_by_player_mut(player_id)
            .ok_or(GameError::RoomNotFound)?;
        let request = room.rematch.as_ref().ok_or(GameError::NoRematchRequest)?;
        if request.requested_by == player_id {
            return Err(GameError::CannotAcceptOwnRequest);
        }

        let solution = self.words.random_solution(room.config.word_length)?;
        room.reset_for_rematch(solution);
        info!(room_id = %room.id, %player_id, "rematch accepted");
        self.connections
            .broadcast(&room.player_ids(), ServerMessage::RematchAccepted);

        let room_id = room.id.clone();
        let epoch = room.epoch;
        drop(state);
        self.spawn_rematch_countdown(room_id, epoch);
        Ok(())
    }

    pub async fn decline_rematch(&self, player_id: PlayerId) -> Result<(), GameError> {
        let mut state = self.state.lock().await;
        let room = state
            .registry
            .find_by_player_mut(player_id)
            .ok_or(GameError::RoomNotFound)?;
        let request = room.rematch.take().ok_or(GameError::NoRematchRequest)?;
        info!(room_id = %room.id, %player_id, "rematch declined");
        self.connections
            .send_to(request.requested_by, ServerMessage::RematchDeclined);
        Ok(())
    }

    /// Departure never fails and never ends a running game by itself;
    /// an empty room is deleted on the spot.
    pub async fn disconnect(&self, player_id: PlayerId) {
        let mut state = self.state.lock().await;
        let OrchestratorState { registry, timers } = &mut *state;
        let Some(room) = registry.find_by_player_mut(player_id) else {
            return;
        };
        let room_id = room.id.clone();
        room.players.retain(|p| p.id != player_id);
        // Any departure voids a pending rematch negotiation; games only
        // ever start at full capacity.
        room.rematch = None;
        let now_empty = room.players.is_empty();

        if now_empty {
            timers.stop_all(&room_id);
            registry.remove(&room_id);
            info!(room_id, "last player left, room deleted");
        } else {
            timers.stop(&room_id, player_id);
            if let Some(room) = registry.find(&room_id) {
                self.connections.broadcast(
                    &room.player_ids(),
                    ServerMessage::PlayerLeft {
                        player_id,
                        state: room.view(),
                    },
                );
            }
        }
    }

    /// One countdown tick. Validates the generation first so a tick
    /// that raced a cancellation or restart is silently dropped.
    pub(crate) async fn handle_tick(
        self: &Arc<Self>,
        room_id: &str,
        player_id: PlayerId,
        generation: u64,
    ) {
        let mut state = self.state.lock().await;
        let OrchestratorState { registry, timers } = &mut *state;
        if timers.generation(room_id, player_id) != Some(generation) {
            return;
        }
        let Some(room) = registry.find_mut(room_id) else {
            timers.stop(room_id, player_id);
            return;
        };
        if room.status != RoomStatus::Playing {
            timers.stop(room_id, player_id);
            return;
        }
        let Some(player) = room.player_mut(player_id) else {
            timers.stop(room_id, player_id);
            return;
        };
        let Some(remaining) = player.remaining_time.map(|t| t.saturating_sub(1)) else {
            return;
        };

        player.remaining_time = Some(remaining);
        self.connections.send_to(
            player_id,
            ServerMessage::TimerUpdate {
                remaining_time: remaining,
            },
        );
        if remaining > 0 {
            return;
        }

        player.timed_out = true;
        timers.stop(room_id, player_id);
        info!(room_id, %player_id, "player timed out");
        self.connections
            .broadcast(&room.player_ids(), ServerMessage::PlayerTimeout { player_id });

        if let Some(outcome) = room.outcome() {
            self.finish_game(registry, timers, room_id, outcome);
        }
    }

    fn finish_game(
        self: &Arc<Self>,
        registry: &mut RoomRegistry,
        timers: &mut TimerManager,
        room_id: &str,
        outcome: GameOutcome,
    ) {
        let Some(room) = registry.find_mut(room_id) else {
            return;
        };
        room.status = RoomStatus::Finished;
        timers.stop_all(room_id);

        let winner = match outcome {
            GameOutcome::Winner(id) => Some(id),
            GameOutcome::Draw => None,
        };
        info!(room_id, winner = ?winner, "game over");
        // The one payload that reveals the solution.
        self.connections.broadcast(
            &room.player_ids(),
            ServerMessage::GameOver {
                state: room.view(),
                solution: room.solution.clone(),
                winner,
            },
        );
        self.schedule_room_cleanup(room_id.to_string(), room.epoch);
    }

    /// Deferred deletion after the grace period. Re-validates the room
    /// when it fires: a rematch (epoch bump) or an already-deleted room
    /// turns this into a no-op.
    fn schedule_room_cleanup(self: &Arc<Self>, room_id: String, epoch: u64) {
        let orch = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(ROOM_CLEANUP_GRACE).await;
            let mut state = orch.state.lock().await;
            let OrchestratorState { registry, timers } = &mut *state;
            let expired = registry
                .find(&room_id)
                .is_some_and(|r| r.status == RoomStatus::Finished && r.epoch == epoch);
            if expired {
                timers.stop_all(&room_id);
                registry.remove(&room_id);
                info!(room_id, "finished room cleaned up");
            }
        });
    }

    /// Three broadcast seconds between accepting a rematch and the new
    /// game's timers starting. Re-validates room and epoch at every
    /// step in case a disconnect deleted the room in the meantime.
    fn spawn_rematch_countdown(self: &Arc<Self>, room_id: String, epoch: u64) {
        let orch = Arc::clone(self);
        tokio::spawn(async move {
            for seconds in (1..=REMATCH_COUNTDOWN_SECS).rev() {
                {
                    let state = orch.state.lock().await;
                    let Some(room) = state.registry.find(&room_id) else {
                        return;
                    };
                    if room.epoch != epoch || room.status != RoomStatus::Playing {
                        return;
                    }
                    orch.connections.broadcast(
                        &room.player_ids(),
                        ServerMessage::RematchCountdown { seconds },
                    );
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let mut state = orch.state.lock().await;
            let OrchestratorState { registry, timers } = &mut *state;
            let Some(room) = registry.find_mut(&room_id) else {
                return;
            };
            if room.epoch != epoch || room.status != RoomStatus::Playing {
                return;
            }
            let limit = room.config.time_limit;
            let rid = room.id.clone();
            for member in &mut room.players {
                timers.start(&orch, &rid, member, limit);
            }
            info!(room_id, "rematch game starting");
            orch.connections.broadcast(
                &room.player_ids(),
                ServerMessage::GameStart { state: room.view() },
            );
        });
    }
}
