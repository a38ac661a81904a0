//! # Mika Common Library
//!
//! Shared code for the Mika album lookup crates:
//! - Error type used by configuration loading
//! - TOML configuration and credential resolution
//! - Logging configuration

pub mod config;
pub mod error;

pub use error::{Error, Result};
