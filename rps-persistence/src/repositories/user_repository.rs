use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use tracing::info;

use crate::entities::{prelude::*, user_stats, users};
use crate::{password, PersistenceError};
use rps_types::{User, UserId};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
        }
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, PersistenceError> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    /// Create a user together with its zeroed stats row
    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, PersistenceError> {
        if self.find_by_username(username).await?.is_some() {
            return Err(PersistenceError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let password_hash = password::hash(password)?;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let txn = self.db.begin().await?;

        let user_model = users::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password: Set(password_hash),
            created_at: Set(now),
        };

        // A concurrent insert can still win the race past the lookup above
        let inserted = match Users::insert(user_model).exec(&txn).await {
            Ok(inserted) => inserted,
            Err(err) if PersistenceError::is_unique_violation(&err) => {
                return Err(PersistenceError::DuplicateUsername {
                    username: username.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let user_id = inserted.last_insert_id;

        let stats_model = user_stats::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            total_games: Set(0),
            wins: Set(0),
            losses: Set(0),
            draws: Set(0),
            current_streak: Set(0),
            best_streak: Set(0),
            updated_at: Set(now),
        };
        UserStats::insert(stats_model).exec(&txn).await?;

        let created_user = Users::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or(PersistenceError::UserNotFound { user_id })?;

        txn.commit().await?;

        info!("Created user {} ({})", created_user.username, created_user.id);
        Ok(Self::model_to_user(created_user))
    }

    /// Look up a user and check the password against the stored hash
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, PersistenceError> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user_model
            .filter(|model| password::verify(password, &model.password))
            .map(Self::model_to_user))
    }
}
