pub mod api;
pub mod errors;
pub mod game;
pub mod messages;
pub mod user;

// Re-export all types
pub use api::*;
pub use errors::*;
pub use game::*;
pub use messages::*;
pub use user::*;
