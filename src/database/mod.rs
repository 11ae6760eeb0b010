pub mod articles;
pub mod manager;
pub mod models;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
