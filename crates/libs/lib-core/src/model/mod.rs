//! # Model
//!
//! Value types shared by the keystore, the hotel client and the web layer.

pub mod address;

pub use address::{Address, AddressError};
