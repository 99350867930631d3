//! # Core Library
//!
//! Configuration, the request error taxonomy, and shared model types.

pub mod config;
pub mod error;
pub mod model;
pub mod dto;

// Re-export commonly used types
pub use config::{Config, ManagerMode};
pub use error::{AppError, Result};
pub use model::Address;
