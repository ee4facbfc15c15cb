//! User registration, administration, and the narrow lookup capability.

pub mod lookup;
pub mod service;

pub use lookup::{StoreUserLookup, UserLookup};
pub use service::{
    ChangePasswordRequest, RegisterRequest, RoleInfo, UpdateProfileRequest, UserService,
};
