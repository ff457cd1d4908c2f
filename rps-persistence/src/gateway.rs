use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::repositories::{GameResultRepository, StatsRepository, UserRepository};
use crate::PersistenceError;
use rps_types::{GameRecord, NewGameResult, StatsUpdate, User, UserId, UserStats};

/// Storage operations the server needs, independent of the backing store
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, PersistenceError>;

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError>;

    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<User>, PersistenceError>;

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, PersistenceError>;

    async fn record_game_result(&self, result: NewGameResult)
        -> Result<GameRecord, PersistenceError>;

    async fn get_user_stats(&self, user_id: UserId) -> Result<Option<UserStats>, PersistenceError>;

    async fn update_user_stats(
        &self,
        user_id: UserId,
        update: StatsUpdate,
    ) -> Result<UserStats, PersistenceError>;

    async fn list_recent_games(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<GameRecord>, PersistenceError>;
}

/// SeaORM-backed gateway
pub struct DatabaseGateway {
    users: UserRepository,
    games: GameResultRepository,
    stats: StatsRepository,
}

impl DatabaseGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            games: GameResultRepository::new(db.clone()),
            stats: StatsRepository::new(db),
        }
    }
}

#[async_trait]
impl PersistenceGateway for DatabaseGateway {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, PersistenceError> {
        self.users.create_user(username, password).await
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, PersistenceError> {
        self.users.find_by_id(user_id).await
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PersistenceError> {
        self.users.find_by_username(username).await
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        self.users.verify_credentials(username, password).await
    }

    async fn record_game_result(
        &self,
        result: NewGameResult,
    ) -> Result<GameRecord, PersistenceError> {
        self.games.record(result).await
    }

    async fn get_user_stats(&self, user_id: UserId) -> Result<Option<UserStats>, PersistenceError> {
        self.stats.find_by_user(user_id).await
    }

    async fn update_user_stats(
        &self,
        user_id: UserId,
        update: StatsUpdate,
    ) -> Result<UserStats, PersistenceError> {
        self.stats.update(user_id, update).await
    }

    async fn list_recent_games(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<GameRecord>, PersistenceError> {
        self.games.recent_for_user(user_id, limit).await
    }
}
