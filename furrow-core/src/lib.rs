//! Furrow Core
//!
//! Core types shared by the Furrow client, poller and CLI.
//!
//! This crate contains:
//! - Domain types: job identifiers, per-domain job statuses and polling profiles
//! - DTOs: request and response bodies of the farm-management API

pub mod domain;
pub mod dto;
