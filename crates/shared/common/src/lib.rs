//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling on top of domain errors
//! - Configuration structures read from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
