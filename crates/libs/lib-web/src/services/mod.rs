//! # Services Layer
//!
//! Business logic behind the handlers:
//!
//! ```text
//! Handlers (HTTP) → Services → Keystore file / Hotel client
//! ```
//!
//! - [`hotel`] - the per-request hotel pipeline (unlock, attach, call, detach)
//! - [`keystore`] - reading, unlocking and replacing the owner keystore
//!
//! Services return `Result<T, AppError>` and pick the error kind where the
//! failure happens.

pub mod hotel;
pub mod keystore;

// Re-export services for convenience
pub use hotel::HotelService;
pub use keystore::KeystoreService;
