//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//!
//! Without `postgres` only the in-memory store is available.

pub mod database;
pub mod memory;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
pub use memory::InMemoryStore;
