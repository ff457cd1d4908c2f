use rps_core::{ChoiceEngine, StatsAccumulator};
use rps_persistence::{PersistenceError, PersistenceGateway};
use rps_types::{GameRecord, NewGameResult, SessionStats, StatsUpdate, UserStats};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("result {claimed} does not follow from {player} vs {computer}")]
    InconsistentOutcome {
        player: rps_types::Move,
        computer: rps_types::Move,
        claimed: rps_types::Outcome,
    },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Stores finished rounds and folds them into the owner's durable stats.
///
/// Shared by the HTTP API and the WebSocket sessions so both paths apply the
/// same accumulator rules.
pub struct ResultRecorder {
    gateway: Arc<dyn PersistenceGateway>,
    // Serializes the read-modify-write on user_stats
    fold_lock: Mutex<()>,
}

impl ResultRecorder {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            fold_lock: Mutex::new(()),
        }
    }

    pub async fn record(&self, result: NewGameResult) -> Result<GameRecord, RecordError> {
        let expected = ChoiceEngine::decide(result.player_choice, result.computer_choice);
        if expected != result.result {
            return Err(RecordError::InconsistentOutcome {
                player: result.player_choice,
                computer: result.computer_choice,
                claimed: result.result,
            });
        }

        if let Some(user_id) = result.user_id {
            if self.gateway.find_user(user_id).await?.is_none() {
                return Err(PersistenceError::UserNotFound { user_id }.into());
            }
        }

        let _guard = self.fold_lock.lock().await;
        let record = self.gateway.record_game_result(result).await?;

        if let Some(user_id) = record.user_id {
            match self.gateway.get_user_stats(user_id).await? {
                Some(current) => {
                    let folded = StatsAccumulator::record(&to_session_stats(&current), record.result);
                    self.gateway
                        .update_user_stats(user_id, to_stats_update(&folded))
                        .await?;
                    debug!("Folded {} into stats for user {}", record.result, user_id);
                }
                None => warn!("No stats row for user {}, result {} not folded", user_id, record.id),
            }
        }

        Ok(record)
    }
}

fn to_session_stats(stats: &UserStats) -> SessionStats {
    let count = |value: i32| u32::try_from(value).unwrap_or(0);
    SessionStats {
        total_rounds: count(stats.total_games),
        wins: count(stats.wins),
        losses: count(stats.losses),
        draws: count(stats.draws),
        current_streak: count(stats.current_streak),
        best_streak: count(stats.best_streak),
    }
}

fn to_stats_update(stats: &SessionStats) -> StatsUpdate {
    let column = |value: u32| Some(i32::try_from(value).unwrap_or(i32::MAX));
    StatsUpdate {
        total_games: column(stats.total_rounds),
        wins: column(stats.wins),
        losses: column(stats.losses),
        draws: column(stats.draws),
        current_streak: column(stats.current_streak),
        best_streak: column(stats.best_streak),
    }
}
