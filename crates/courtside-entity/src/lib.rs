//! # courtside-entity
//!
//! Domain entity models for Courtside. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod allocation;
pub mod booking;
pub mod class;
pub mod club;
pub mod payment;
pub mod pista;
pub mod session;
pub mod slug;
pub mod user;
