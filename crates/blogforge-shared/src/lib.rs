//! # BlogForge Shared
//!
//! Request and response types shared by the HTTP layer and its clients.
//! This crate has no dependency on the domain crates so it can be compiled
//! for a browser client as well.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldErrors};
