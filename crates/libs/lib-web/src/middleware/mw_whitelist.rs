//! # Peer Whitelist Middleware
//!
//! Rejects requests from peers that are not in `WHITELIST` with
//! `403 Forbidden`. An empty whitelist lets every peer through.
//!
//! The peer address comes from `ConnectInfo<SocketAddr>`, so the router must be
//! served with `into_make_service_with_connect_info`. When the whitelist is
//! non-empty and the peer address is unknown, the request is rejected.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

pub async fn require_whitelisted(
    State(whitelist): State<Arc<[IpAddr]>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if whitelist.is_empty() {
        return Ok(next.run(req).await);
    }

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    match peer {
        Some(ip) if whitelist.contains(&ip) => Ok(next.run(req).await),
        _ => {
            warn!(peer = ?peer, path = %req.uri().path(), "Request from non-whitelisted peer");
            Err(StatusCode::FORBIDDEN)
        }
    }
}
