//! Authentication: username/password login issuing JWT access tokens.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
