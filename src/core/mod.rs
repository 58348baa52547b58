//! Core types shared by the access layer
//!
//! - `AccessConfig` / `LoggingConfig` - Configuration
//! - `AccessError` - Error types

pub mod config;
pub mod error;

pub use config::{AccessConfig, LoggingConfig};
pub use error::{AccessError, AccessResult};
