//! # Hotel Client Errors

use thiserror::Error;

/// Failures reported by a hotel client.
#[derive(Debug, Error)]
pub enum HotelError {
    /// The hotel address is not a 20-byte hex address.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// The node or bridge could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The bridge answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The transaction was rejected by the contract.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// No attached signer for the account that must sign.
    #[error("No signer attached for {0}")]
    MissingSigner(String),

    /// The account is already in this client's signer set.
    #[error("Signer {0} is already attached")]
    DuplicateSigner(String),

    /// The bridge answered with something that is not a valid result.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
