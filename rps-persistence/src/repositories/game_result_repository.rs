use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{game_results, prelude::*};
use crate::PersistenceError;
use rps_types::{GameRecord, NewGameResult, UserId};

pub struct GameResultRepository {
    db: DatabaseConnection,
}

impl GameResultRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: game_results::Model) -> GameRecord {
        GameRecord {
            id: model.id,
            user_id: model.user_id,
            player_choice: model.player_choice.into(),
            computer_choice: model.computer_choice.into(),
            result: model.result.into(),
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn record(&self, result: NewGameResult) -> Result<GameRecord, PersistenceError> {
        if let Some(user_id) = result.user_id {
            if Users::find_by_id(user_id).one(&self.db).await?.is_none() {
                return Err(PersistenceError::UserNotFound { user_id });
            }
        }

        let model = game_results::ActiveModel {
            id: NotSet,
            user_id: Set(result.user_id),
            player_choice: Set(result.player_choice.into()),
            computer_choice: Set(result.computer_choice.into()),
            result: Set(result.result.into()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let inserted = GameResults::insert(model).exec(&self.db).await?;

        let saved = GameResults::find_by_id(inserted.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                PersistenceError::Database(sea_orm::DbErr::RecordNotFound(
                    "Failed to retrieve recorded game result".to_string(),
                ))
            })?;

        Ok(Self::model_to_record(saved))
    }

    /// Newest first
    pub async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<GameRecord>, PersistenceError> {
        let games = GameResults::find()
            .filter(game_results::Column::UserId.eq(user_id))
            .order_by_desc(game_results::Column::CreatedAt)
            .order_by_desc(game_results::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(games.into_iter().map(Self::model_to_record).collect())
    }
}
