use futures_util::{SinkExt, StreamExt};
use rps_core::RoundTimings;
use rps_persistence::PersistenceGateway;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::results::ResultRecorder;
use crate::session::GameSession;
use rps_types::ClientMessage;

pub mod connection;
pub mod handlers;
pub mod rate_limiter;


use connection::ConnectionId;
pub use connection::ConnectionManager;
use handlers::MessageHandler;
use rate_limiter::RateLimiter;

#[derive(Debug, Error)]
enum ConnectionError {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Connection closed: {0}")]
    Closed(String),
}

pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    gateway: Arc<dyn PersistenceGateway>,
    recorder: Arc<ResultRecorder>,
    timings: RoundTimings,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_sender, mut ws_receiver) = websocket.split();
    let mut rate_limiter = RateLimiter::new();

    // Create connection and get receiver for outgoing messages
    let message_receiver = connection_manager.create_connection(connection_id).await;

    let message_handler = MessageHandler::new(
        connection_id,
        connection_manager.clone(),
        gateway,
        recorder,
        GameSession::live(timings),
    );

    if let Err(e) = message_handler.send_snapshot().await {
        warn!("Failed to send initial snapshot to {}: {}", connection_id, e);
    }

    let incoming_handler = {
        let message_handler = message_handler.clone();

        async move {
            while let Some(result) = ws_receiver.next().await {
                match result {
                    Ok(msg) => {
                        if let Err(e) =
                            handle_message(msg, &mut rate_limiter, &message_handler, connection_id)
                                .await
                        {
                            error!("Error handling message for {}: {}", connection_id, e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                }
            }
        }
    };

    let outgoing_handler = async move {
        let mut receiver = message_receiver;

        while let Some(message) = receiver.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if let Err(e) = ws_sender.send(Message::text(json)).await {
                warn!("Failed to send message to {}: {:?}", connection_id, e);
                break;
            }
        }
        let _ = ws_sender.close().await;
    };

    let round_driver = message_handler.drive_rounds();

    tokio::select! {
        _ = incoming_handler => {},
        _ = outgoing_handler => {},
        _ = round_driver => {},
    }

    info!("Connection {} disconnected", connection_id);
    connection_manager.remove_connection(connection_id).await;
}

async fn handle_message(
    msg: Message,
    rate_limiter: &mut RateLimiter,
    message_handler: &MessageHandler,
    connection_id: ConnectionId,
) -> Result<(), ConnectionError> {
    if !rate_limiter.check_rate_limit() {
        warn!("Rate limit exceeded for connection {}", connection_id);
        return Err(ConnectionError::RateLimited);
    }

    // Only handle text messages
    let Ok(text) = msg.to_str() else {
        return Ok(());
    };

    let client_message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            return message_handler
                .send_error(&format!("Invalid JSON message: {}", e))
                .await
                .map_err(ConnectionError::Closed);
        }
    };

    message_handler
        .handle_message(client_message)
        .await
        .map_err(ConnectionError::Closed)
}
