//! # Hotel Manager Client
//!
//! The interface every hotel client implements.
//!
//! ## Lifecycle
//!
//! ```text
//! factory.build(options) → client (empty wallet)
//!     → client.wallet().attach(account) → guard
//!     → one call (signed by options.owner)
//!     → drop(guard)
//! ```
//!
//! Clients are cheap and are never shared between requests, so a signer
//! attached to one client is invisible to every other request.

use crate::error::HotelError;
use crate::types::{Hotel, TxReceipt, UnitTypeDraft, UnitTypeInfo};
use crate::wallet::Wallet;
use async_trait::async_trait;
use lib_core::Address;

/// Settings a client is bound to for its whole life.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Hotel index contract
    pub index_address: Address,
    /// Multiplier applied to estimated gas
    pub gas_margin: f64,
    /// Account that signs mutating calls; `None` for read-only clients
    pub owner: Option<Address>,
}

/// Operations on hotels and their unit types.
///
/// Hotel addresses are passed as received; implementations reject malformed
/// ones with [`HotelError::InvalidAddress`]. Mutating calls are signed by
/// [`ClientOptions::owner`], which must be attached to [`HotelManager::wallet`].
#[async_trait]
pub trait HotelManager: Send + Sync {
    fn options(&self) -> &ClientOptions;

    /// Signer set of this client.
    fn wallet(&self) -> &Wallet;

    async fn get_hotel(&self, hotel_address: &str) -> Result<Hotel, HotelError>;

    async fn add_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &UnitTypeDraft,
    ) -> Result<TxReceipt, HotelError>;

    async fn remove_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
    ) -> Result<TxReceipt, HotelError>;

    async fn edit_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        info: &UnitTypeInfo,
    ) -> Result<TxReceipt, HotelError>;

    async fn add_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        url: &str,
    ) -> Result<TxReceipt, HotelError>;

    async fn remove_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        image_index: u32,
    ) -> Result<TxReceipt, HotelError>;

    async fn add_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError>;

    async fn remove_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError>;
}

/// Builds a fresh client per request.
pub trait HotelManagerFactory: Send + Sync {
    fn build(&self, options: ClientOptions) -> Box<dyn HotelManager>;
}

pub(crate) fn parse_hotel_address(raw: &str) -> Result<Address, HotelError> {
    raw.parse()
        .map_err(|_| HotelError::InvalidAddress(raw.to_string()))
}
