use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameRecord, User, UserStats};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameResultResponse {
    pub game_result: GameRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatsResponse {
    pub stats: UserStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecentGamesResponse {
    pub recent_games: Vec<GameRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Outcome};

    #[test]
    fn test_envelopes_use_camel_case_keys() {
        let record = GameRecord {
            id: 1,
            user_id: Some(2),
            player_choice: Move::Rock,
            computer_choice: Move::Scissors,
            result: Outcome::Win,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(GameResultResponse {
            game_result: record.clone(),
        })
        .unwrap();
        assert_eq!(json["gameResult"]["playerChoice"], "rock");
        assert_eq!(json["gameResult"]["userId"], 2);

        let json = serde_json::to_value(RecentGamesResponse {
            recent_games: vec![record],
        })
        .unwrap();
        assert_eq!(json["recentGames"][0]["computerChoice"], "scissors");
    }
}
