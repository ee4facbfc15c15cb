//! Pista (court) management.

pub mod service;

pub use service::{CreatePistaRequest, PistaService};
