pub mod connection;

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use room_types::{ClientMessage, GameError, PlayerId, ServerMessage};
use tracing::{info, warn};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::orchestrator::GameOrchestrator;
use self::connection::ConnectionManager;

/// One task per socket: register an outbound channel, forward it to
/// the sink, and feed inbound JSON actions to the orchestrator until
/// the peer goes away.
pub async fn handle_connection(
    ws: WebSocket,
    connections: Arc<ConnectionManager>,
    orchestrator: Arc<GameOrchestrator>,
) {
    let player_id: PlayerId = Uuid::new_v4();
    info!(%player_id, "websocket connected");

    let (mut ws_tx, mut ws_rx) = ws.split();
    let mut outbound = connections.register(player_id);

    let forward = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let Ok(text) = serde_json::to_string(&message) else {
                continue;
            };
            if ws_tx.send(Message::text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                warn!(%player_id, "websocket error: {}", e);
                break;
            }
        };
        if message.is_close() {
            break;
        }
        let Ok(text) = message.to_str() else {
            continue;
        };
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(action) => dispatch(&orchestrator, &connections, player_id, action).await,
            Err(e) => connections.send_to(
                player_id,
                ServerMessage::Error {
                    message: format!("malformed message: {e}"),
                },
            ),
        }
    }

    info!(%player_id, "websocket disconnected");
    orchestrator.disconnect(player_id).await;
    connections.remove(player_id);
    forward.abort();
}

async fn dispatch(
    orchestrator: &Arc<GameOrchestrator>,
    connections: &Arc<ConnectionManager>,
    player_id: PlayerId,
    action: ClientMessage,
) {
    let result = match action {
        ClientMessage::CreateRoom {
            name,
            max_players,
            word_length,
            time_limit,
        } => {
            orchestrator
                .create_room(player_id, name, max_players, word_length, time_limit)
                .await
        }
        ClientMessage::JoinRoom { room_id, name } => {
            orchestrator.join_room(player_id, &room_id, name).await
        }
        ClientMessage::MakeGuess { guess } => orchestrator.make_guess(player_id, &guess).await,
        ClientMessage::RequestRematch => orchestrator.request_rematch(player_id).await,
        ClientMessage::AcceptRematch => orchestrator.accept_rematch(player_id).await,
        ClientMessage::DeclineRematch => orchestrator.decline_rematch(player_id).await,
    };

    // Errors only ever go back to the acting player; word errors are a
    // separate category so the client can prompt for another word.
    if let Err(error) = result {
        let message = if error.is_word_error() {
            ServerMessage::InvalidWord {
                message: error.to_string(),
            }
        } else {
            ServerMessage::Error {
                message: error.to_string(),
            }
        };
        connections.send_to(player_id, message);
        if !matches!(error, GameError::InvalidWord { .. }) {
            warn!(%player_id, "action rejected: {}", error);
        }
    }
}
