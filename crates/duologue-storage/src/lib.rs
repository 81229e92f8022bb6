// Postgres storage layer with sqlx
//
// Durable conversation documents: participant descriptors, an append-only
// message sequence, a running message count, and create/update timestamps.

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;
