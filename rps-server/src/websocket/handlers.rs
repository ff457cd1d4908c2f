use rps_core::RoundError;
use rps_persistence::PersistenceGateway;
use rps_types::{ClientMessage, Move, ServerMessage};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, error, info, warn};

use crate::results::ResultRecorder;
use crate::session::{GameSession, SessionOutput};
use crate::websocket::connection::{ConnectionId, ConnectionManager};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    gateway: Arc<dyn PersistenceGateway>,
    recorder: Arc<ResultRecorder>,
    session: Arc<Mutex<GameSession>>,
    // Wakes the round driver when the session's deadline changes
    deadline_changed: Arc<Notify>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        gateway: Arc<dyn PersistenceGateway>,
        recorder: Arc<ResultRecorder>,
        session: GameSession,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            gateway,
            recorder,
            session: Arc::new(Mutex::new(session)),
            deadline_changed: Arc::new(Notify::new()),
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        self.connection_manager
            .update_activity(self.connection_id)
            .await;

        match message {
            ClientMessage::SelectMove { choice } => self.handle_select_move(choice).await,
            ClientMessage::ResetSession => self.handle_reset().await,
            ClientMessage::BindUser { username, password } => {
                self.handle_bind_user(username, password).await
            }
            ClientMessage::UnbindUser => self.handle_unbind_user().await,
            ClientMessage::GetSnapshot => self.send_snapshot().await,
            ClientMessage::Heartbeat => Ok(()),
        }
    }

    pub async fn send_snapshot(&self) -> Result<(), String> {
        let message = self.session.lock().await.snapshot_message();
        self.send_message(message).await
    }

    /// Sleep until the next phase deadline, apply it, repeat. Returns once the
    /// connection can no longer be written to.
    pub async fn drive_rounds(&self) {
        loop {
            let deadline = self.session.lock().await.next_deadline();

            match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline.into()) => {
                            let output = self.session.lock().await.poll();
                            if let Err(e) = self.dispatch(output).await {
                                debug!("Round driver for {} stopping: {}", self.connection_id, e);
                                return;
                            }
                        }
                        _ = self.deadline_changed.notified() => {}
                    }
                }
                None => self.deadline_changed.notified().await,
            }
        }
    }

    async fn handle_select_move(&self, choice: Move) -> Result<(), String> {
        let selection = self.session.lock().await.select(choice);

        match selection {
            Ok(output) => {
                self.deadline_changed.notify_one();
                self.dispatch(output).await
            }
            Err(RoundError::RoundInFlight { phase }) => {
                debug!(
                    "Connection {} selected {} while {}",
                    self.connection_id, choice, phase
                );
                self.send_message(ServerMessage::SelectionRejected { phase })
                    .await
            }
        }
    }

    async fn handle_reset(&self) -> Result<(), String> {
        let output = self.session.lock().await.reset();
        self.deadline_changed.notify_one();
        self.dispatch(output).await
    }

    async fn handle_bind_user(&self, username: String, password: String) -> Result<(), String> {
        match self.gateway.verify_credentials(&username, &password).await {
            Ok(Some(user)) => {
                info!("Connection {} bound to user {}", self.connection_id, user.id);
                self.session.lock().await.bind(user.clone());
                self.connection_manager
                    .set_connection_user(self.connection_id, Some(user.clone()))
                    .await;
                self.send_message(ServerMessage::UserBound { user }).await
            }
            Ok(None) => {
                warn!(
                    "Rejected credentials for {} on connection {}",
                    username, self.connection_id
                );
                self.send_error("Invalid credentials").await
            }
            Err(e) => {
                error!("Failed to verify credentials for {}: {}", username, e);
                self.send_error("Internal server error").await
            }
        }
    }

    async fn handle_unbind_user(&self) -> Result<(), String> {
        self.session.lock().await.unbind();
        self.connection_manager
            .set_connection_user(self.connection_id, None)
            .await;
        self.send_message(ServerMessage::UserUnbound).await
    }

    /// Send rendered messages and file any settled results in the background
    async fn dispatch(&self, output: SessionOutput) -> Result<(), String> {
        for result in output.results {
            let recorder = self.recorder.clone();
            let connection_id = self.connection_id;
            tokio::spawn(async move {
                if let Err(e) = recorder.record(result).await {
                    error!("Failed to record result for {}: {}", connection_id, e);
                }
            });
        }

        for message in output.messages {
            self.send_message(message).await?;
        }
        Ok(())
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    pub async fn send_error(&self, error_message: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: error_message.to_string(),
        })
        .await
    }
}
