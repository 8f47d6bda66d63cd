pub mod connection;
pub mod errors;
pub mod queries;

pub use connection::{create_pool, health_check, with_retry};
pub use errors::DatabaseError;
