//! # Authentication Library
//!
//! Owner credentials: encrypted keystores and the accounts they unlock.
//!
//! A keystore is only ever decrypted for the duration of one request. The
//! resulting [`Account`] holds the signing key and is handed to the hotel
//! client's signer set, never stored anywhere else.

pub mod account;
pub mod keystore;

// Re-export commonly used types
pub use account::{Account, RecoverableSignature};
pub use keystore::{decrypt_keystore, encrypt_keystore, EncryptOptions, KeystoreError, KeystoreFile};
