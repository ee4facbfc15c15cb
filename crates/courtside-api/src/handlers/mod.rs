//! Request handlers grouped by domain.

pub mod auth;
pub mod bookings;
pub mod classes;
pub mod clubs;
pub mod health;
pub mod payments;
pub mod pistas;
pub mod profile;
pub mod users;
