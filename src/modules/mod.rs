//! Feature modules, one directory per resource.
//!
//! Every module follows the same layout: `model` (rows and DTOs),
//! `service` (database access), `controller` (HTTP handlers) and
//! `router` (route table).

pub mod auth;
pub mod comments;
pub mod discounts;
pub mod evaluation_settings;
pub mod semesters;
pub mod supervision;
pub mod teachers;
pub mod teaching_duty;
pub mod teaching_events;
pub mod teaching_groups;
pub mod users;
