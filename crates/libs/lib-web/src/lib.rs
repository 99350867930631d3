//! # Web Library
//!
//! HTTP handlers, extractors, middleware, services and server setup for the
//! hotel unit-type API.

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState};
