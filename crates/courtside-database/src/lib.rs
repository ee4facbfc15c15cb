//! # courtside-database
//!
//! Persistence for Courtside: the store traits every service depends on,
//! their PostgreSQL repository implementations, and process-local
//! in-memory implementations with the same atomicity guarantees.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use stores::StoreSet;
