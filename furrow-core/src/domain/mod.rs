//! Core domain types
//!
//! Asynchronous backend jobs (document processing, field imports, field-plan
//! and report generation) are only observable by polling their status.
//! These types describe the jobs independently of how they are polled.

pub mod job;
pub mod status;

pub use job::{JobId, JobKind, PollProfile};
pub use status::{DocumentStatus, GenerationStatus, ImportStatus, JobState};
