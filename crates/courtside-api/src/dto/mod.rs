//! Request and response bodies specific to the HTTP layer.

pub mod request;
pub mod response;
