use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Move, Outcome};

pub type UserId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewGameResult {
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub player_choice: Move,
    pub computer_choice: Move,
    pub result: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameRecord {
    pub id: i32,
    pub user_id: Option<UserId>,
    pub player_choice: Move,
    pub computer_choice: Move,
    pub result: Outcome,
    pub created_at: String, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub id: i32,
    pub user_id: UserId,
    pub total_games: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub current_streak: i32,
    pub best_streak: i32,
    pub updated_at: String, // ISO 8601 string
}

/// Partial stats write; `None` fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatsUpdate {
    pub total_games: Option<i32>,
    pub wins: Option<i32>,
    pub losses: Option<i32>,
    pub draws: Option<i32>,
    pub current_streak: Option<i32>,
    pub best_streak: Option<i32>,
}
