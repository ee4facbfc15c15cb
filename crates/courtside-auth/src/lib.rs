//! # courtside-auth
//!
//! Authentication and authorization for Courtside.
//!
//! ## Modules
//!
//! - `jwt`: access/refresh token encoding, decoding, and per-role lifetimes
//! - `password`: Argon2id hashing and credential policy
//! - `rbac`: role to capability mapping
//! - `session`: login, refresh rotation with reuse detection, logout

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPolicy};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Capability, RbacEnforcer, RbacPolicies};
pub use session::{
    LogAlertSink, SecurityAlert, SecurityAlertSink, SessionCleanup, SessionError, SessionManager,
};
