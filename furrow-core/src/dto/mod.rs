//! Data transfer objects
//!
//! Request and response bodies exchanged with the farm-management API.

pub mod document;
pub mod generation;
pub mod import;
