//! Group classes and their enrollments.

pub mod enrollment;
pub mod service;

pub use enrollment::EnrollmentService;
pub use service::{ClassDetail, ClassService, CreateClassRequest, UpdateClassRequest};
