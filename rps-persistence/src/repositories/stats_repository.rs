use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
};

use crate::entities::{prelude::UserStats as UserStatsEntity, user_stats};
use crate::PersistenceError;
use rps_types::{StatsUpdate, UserId, UserStats};

pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_stats(model: user_stats::Model) -> UserStats {
        UserStats {
            id: model.id,
            user_id: model.user_id,
            total_games: model.total_games,
            wins: model.wins,
            losses: model.losses,
            draws: model.draws,
            current_streak: model.current_streak,
            best_streak: model.best_streak,
            updated_at: model.updated_at.to_rfc3339(),
        }
    }

    async fn find_model(&self, user_id: UserId) -> Result<Option<user_stats::Model>, PersistenceError> {
        Ok(UserStatsEntity::find()
            .filter(user_stats::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<UserStats>, PersistenceError> {
        Ok(self.find_model(user_id).await?.map(Self::model_to_stats))
    }

    /// Apply a partial update; fields left as `None` keep their stored value
    pub async fn update(
        &self,
        user_id: UserId,
        update: StatsUpdate,
    ) -> Result<UserStats, PersistenceError> {
        let model = self
            .find_model(user_id)
            .await?
            .ok_or(PersistenceError::StatsNotFound { user_id })?;

        let mut active = model.into_active_model();
        if let Some(total_games) = update.total_games {
            active.total_games = Set(total_games);
        }
        if let Some(wins) = update.wins {
            active.wins = Set(wins);
        }
        if let Some(losses) = update.losses {
            active.losses = Set(losses);
        }
        if let Some(draws) = update.draws {
            active.draws = Set(draws);
        }
        if let Some(current_streak) = update.current_streak {
            active.current_streak = Set(current_streak);
        }
        if let Some(best_streak) = update.best_streak {
            active.best_streak = Set(best_streak);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = UserStatsEntity::update(active).exec(&self.db).await?;
        Ok(Self::model_to_stats(updated))
    }
}
