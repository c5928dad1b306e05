use std::sync::Arc;

use warp::Filter;

use crate::orchestrator::GameOrchestrator;
use crate::websocket::connection::ConnectionManager;

pub mod config;
pub mod orchestrator;
pub mod timer;
pub mod websocket;

#[derive(serde::Serialize)]
struct StatusResponse {
    active_rooms: usize,
    connected_players: usize,
}

pub fn create_routes(
    connections: Arc<ConnectionManager>,
    orchestrator: Arc<GameOrchestrator>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let connections_filter = warp::any().map({
        let connections = connections.clone();
        move || connections.clone()
    });

    let orchestrator_filter = warp::any().map({
        let orchestrator = orchestrator.clone();
        move || orchestrator.clone()
    });

    // WebSocket endpoint
    let ws_route = warp::path("ws")
        .and(warp::ws())
        .and(connections_filter.clone())
        .and(orchestrator_filter.clone())
        .map(
            |ws: warp::ws::Ws,
             connections: Arc<ConnectionManager>,
             orchestrator: Arc<GameOrchestrator>| {
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, connections, orchestrator)
                })
            },
        );

    // Liveness endpoint with a couple of gauges
    let status_route = warp::path("status")
        .and(warp::get())
        .and(connections_filter)
        .and(orchestrator_filter)
        .and_then(
            |connections: Arc<ConnectionManager>, orchestrator: Arc<GameOrchestrator>| async move {
                let response = StatusResponse {
                    active_rooms: orchestrator.active_rooms().await,
                    connected_players: connections.count(),
                };
                Ok::<_, warp::Rejection>(warp::reply::json(&response))
            },
        );

    ws_route.or(status_route)
}
