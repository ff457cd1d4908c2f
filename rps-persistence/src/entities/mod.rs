pub mod prelude;

pub mod game_results;
pub mod user_stats;
pub mod users;
