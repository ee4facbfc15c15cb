//! Pista (court) entities.

pub mod model;

pub use model::{CreatePista, Pista, UpdatePista};
