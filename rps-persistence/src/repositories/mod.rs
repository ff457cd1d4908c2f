pub mod game_result_repository;
pub mod stats_repository;
pub mod user_repository;

pub use game_result_repository::GameResultRepository;
pub use stats_repository::StatsRepository;
pub use user_repository::UserRepository;
