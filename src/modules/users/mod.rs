//! User account management.
//!
//! Creating a user also creates its role-specific sub-record (controller
//! or teacher) in the same transaction; see
//! [`service::UserService::create_user`].

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
