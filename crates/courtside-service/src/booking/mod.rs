//! Pista bookings.

pub mod pricing;
pub mod service;

pub use service::{BookingService, CreateBookingRequest, UpdateBookingRequest};
