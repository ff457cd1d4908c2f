pub use super::game_results::Entity as GameResults;
pub use super::user_stats::Entity as UserStats;
pub use super::users::Entity as Users;
