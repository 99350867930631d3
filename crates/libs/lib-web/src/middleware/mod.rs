//! # Middleware
//!
//! Axum middleware applied to every route.
//!
//! ## Modules
//!
//! - **[`mw_req_stamp`]**: Request ID stamping
//! - **[`mw_logging`]**: Request/response logging without bodies
//! - **[`mw_whitelist`]**: Peer IP whitelist

// region: --- Modules
pub mod mw_logging;
pub mod mw_req_stamp;
pub mod mw_whitelist;
// endregion: --- Modules

// region: --- Re-exports
pub use mw_logging::log_requests;
pub use mw_req_stamp::{stamp_req, RequestStamp};
pub use mw_whitelist::require_whitelisted;
// endregion: --- Re-exports
