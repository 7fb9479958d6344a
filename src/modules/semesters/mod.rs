//! Semester management. Exactly one semester can be active at a time.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
