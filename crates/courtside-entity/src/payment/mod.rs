//! Payment entities.

pub mod model;
pub mod target;

pub use model::{NewPayment, Payment, PaymentProvider, PaymentRow, PaymentStatus};
pub use target::PaymentTarget;
