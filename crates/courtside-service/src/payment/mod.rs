//! Payments through a pluggable gateway.

pub mod gateway;
pub mod service;

pub use gateway::{MockGateway, PaymentGateway};
pub use service::PaymentService;
