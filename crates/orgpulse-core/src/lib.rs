//! Core types, configuration, and error handling for the orgpulse platform.
//!
//! This crate provides the shared foundation used by all other orgpulse
//! crates:
//! - [`PulseError`] — unified error type using `thiserror`
//! - [`PulseConfig`] — configuration loaded from `.orgpulse.toml`
//! - Record types: [`Repository`], [`Commit`], [`Contributor`]
//! - [`Capabilities`] — what the loaded collections can support
//! - [`OutputFormat`] — CLI output selection

mod config;
mod error;
mod types;

pub use config::{AnalyticsConfig, DataConfig, PulseConfig};
pub use error::PulseError;
pub use types::{Capabilities, Commit, Contributor, OutputFormat, Repository};

/// A convenience `Result` type for orgpulse operations.
pub type Result<T> = std::result::Result<T, PulseError>;
