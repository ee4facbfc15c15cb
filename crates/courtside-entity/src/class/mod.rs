//! Group class and enrollment entities.

pub mod enrollment;
pub mod model;
pub mod status;

pub use enrollment::{Enrollment, EnrollmentStatus};
pub use model::{Class, ClassPatch, NewClass};
pub use status::ClassStatus;
