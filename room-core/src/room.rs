use room_types::{Player, PlayerId, RoomConfig, RoomStatus, RoomView};

/// Pending rematch negotiation; exists only between `Finished` and the
/// next `Playing` transition.
#[derive(Debug, Clone)]
pub struct RematchRequest {
    pub requested_by: PlayerId,
    pub accepted: bool,
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(PlayerId),
    Draw,
}

/// One room's full game state, including the hidden solution. The
/// registry owns every instance; clients only ever see [`RoomView`].
#[derive(Debug)]
pub struct GameRoom {
    pub id: String,
    pub config: RoomConfig,
    pub status: RoomStatus,
    pub players: Vec<Player>,
    pub solution: String,
    pub created_at: String,
    pub rematch: Option<RematchRequest>,
    /// Bumped on every rematch reset so deferred tasks scheduled for a
    /// previous game can detect they are stale.
    pub epoch: u64,
}

impl GameRoom {
    pub fn new(id: String, config: RoomConfig, solution: String) -> Self {
        Self {
            id,
            config,
            status: RoomStatus::Waiting,
            players: Vec::new(),
            solution,
            created_at: chrono::Utc::now().to_rfc3339(),
            rematch: None,
            epoch: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.config.max_players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn contains_player(&self, player_id: PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    /// Ids of every member except `player_id`.
    pub fn other_player_ids(&self, player_id: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .map(|p| p.id)
            .filter(|id| *id != player_id)
            .collect()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// End-of-game check. A solver wins immediately; otherwise the game
    /// is a draw once nobody can act any more (everyone timed out, or
    /// every player is out of attempts or timed out).
    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(winner) = self.players.iter().find(|p| p.has_solved()) {
            return Some(GameOutcome::Winner(winner.id));
        }
        if !self.players.is_empty() && self.players.iter().all(|p| p.timed_out) {
            return Some(GameOutcome::Draw);
        }
        if !self.players.is_empty() && self.players.iter().all(|p| p.is_done()) {
            return Some(GameOutcome::Draw);
        }
        None
    }

    /// Fresh game in the same room: new solution, every player's
    /// history, clock, ready and timed-out state reset.
    pub fn reset_for_rematch(&mut self, solution: String) {
        self.solution = solution;
        self.rematch = None;
        self.status = RoomStatus::Playing;
        self.epoch += 1;
        for player in &mut self.players {
            player.guesses.clear();
            player.remaining_time = self.config.time_limit;
            player.ready = true;
            player.timed_out = false;
        }
    }

    /// Sanitized projection for clients; never carries the solution.
    pub fn view(&self) -> RoomView {
        RoomView {
            id: self.id.clone(),
            status: self.status,
            config: self.config,
            players: self.players.clone(),
            created_at: self.created_at.clone(),
        }
    }
}
