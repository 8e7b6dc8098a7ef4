//! Local SQLite persistence.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::{CardRepository, JournalRepository, SqliteRepository};
