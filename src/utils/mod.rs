//! Shared utilities: error type, JWT handling, password hashing, pagination,
//! serde helpers.

pub mod errors;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod serde;
