//! Teacher records: duty targets, retirement dates, group membership.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
