//! Application configuration, loaded from environment variables.
//!
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: JWT signing secret and token lifetime
//! - [`cors`]: allowed origins for the SPA frontend
//! - [`server`]: listen address

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;
