pub mod database;
pub mod error;
pub mod memory;
pub mod models;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use database::Database;
pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use record::{Record, Row};
pub use schema::Table;
pub use store::RecordStore;
pub use value::{OpaquePayload, SqlValue};
