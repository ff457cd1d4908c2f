pub mod connection;
pub mod entities;
pub mod errors;
pub mod gateway;
pub mod password;
pub mod repositories;

pub use errors::PersistenceError;
pub use gateway::{DatabaseGateway, PersistenceGateway};
