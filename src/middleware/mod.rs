//! Authentication and authorization middleware.
//!
//! - [`auth`]: JWT extraction via the `AuthUser` extractor
//! - [`role`]: controller/teacher role checks as layers and extractors

pub mod auth;
pub mod role;
