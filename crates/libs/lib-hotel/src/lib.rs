//! # Hotel Library
//!
//! Client seam for the on-chain hotel index: the [`HotelManager`] trait, the
//! per-client signer set, and two implementations.
//!
//! - [`rpc::RpcHotelManager`] talks JSON-RPC to a hotel-manager bridge.
//! - [`memory::InMemoryLedger`] keeps hotels in process, for development and tests.
//!
//! A client is built per request through a [`HotelManagerFactory`]; its
//! [`Wallet`] starts empty and only ever holds that request's owner account.

pub mod client;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod rpc;
pub mod types;
pub mod wallet;

// Re-export commonly used types
pub use client::{ClientOptions, HotelManager, HotelManagerFactory};
pub use error::HotelError;
pub use memory::InMemoryLedger;
pub use mutation::Mutation;
pub use rpc::RpcHotelManagerFactory;
pub use types::{Hotel, Log, TxReceipt, UnitType, UnitTypeDraft, UnitTypeInfo};
pub use wallet::{SignerGuard, Wallet};
