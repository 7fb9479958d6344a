//! Teaching groups for the controlling group analysis.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
