//! # BlogForge Core
//!
//! The domain layer of BlogForge.
//! This crate contains posts, authors, validation rules and the services that
//! sit between the HTTP layer and the persistence/cache ports. It has zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{PostError, RepoError};
pub use services::{ExploreService, PostService};
