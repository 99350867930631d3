//! # In-Memory Ledger
//!
//! A process-local hotel index. Every client built from an [`InMemoryLedger`]
//! sees the same hotels, and the ledger records each call it receives
//! together with the address that signed it.
//!
//! Used when `HOTEL_MANAGER_MODE=memory` and by the HTTP tests, which also
//! use the fault hooks ([`InMemoryLedger::reject_next`],
//! [`InMemoryLedger::suppress_logs`], [`InMemoryLedger::set_delay`]).

use crate::client::{parse_hotel_address, ClientOptions, HotelManager, HotelManagerFactory};
use crate::error::HotelError;
use crate::types::{Hotel, Log, TxReceipt, UnitType, UnitTypeDraft, UnitTypeInfo};
use crate::wallet::Wallet;
use async_trait::async_trait;
use lib_core::Address;
use serde_json::json;
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// A call the ledger received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: String,
    pub hotel: String,
    /// Address recovered from the call's signature; `None` for reads and
    /// for calls that could not be signed
    pub signer: Option<Address>,
}

#[derive(Default)]
struct LedgerState {
    hotels: HashMap<Address, Hotel>,
    calls: Vec<RecordedCall>,
    receipts: Vec<TxReceipt>,
    reject_next: Option<String>,
    suppress_logs: bool,
    delay: Option<Duration>,
    nonce: u64,
    block_number: u64,
    last_wallet: Option<Wallet>,
}

/// Shared in-process hotel index. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty hotel managed by `manager`.
    pub fn register_hotel(
        &self,
        address: Address,
        manager: Address,
        name: impl Into<String>,
        description: impl Into<String>,
    ) {
        let hotel = Hotel {
            address,
            name: name.into(),
            description: description.into(),
            manager,
            unit_types: Default::default(),
        };
        self.lock().hotels.insert(address, hotel);
        info!(%address, %manager, "Hotel registered in memory ledger");
    }

    pub fn hotel(&self, address: &Address) -> Option<Hotel> {
        self.lock().hotels.get(address).cloned()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn receipts(&self) -> Vec<TxReceipt> {
        self.lock().receipts.clone()
    }

    /// Revert the next mutating call with `reason`.
    pub fn reject_next(&self, reason: impl Into<String>) {
        self.lock().reject_next = Some(reason.into());
    }

    /// Emit receipts without logs.
    pub fn suppress_logs(&self, suppress: bool) {
        self.lock().suppress_logs = suppress;
    }

    /// Delay every call by `delay` before it is processed.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.lock().delay = delay;
    }

    /// Wallet of the most recently built client.
    pub fn last_wallet(&self) -> Option<Wallet> {
        self.lock().last_wallet.clone()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HotelManagerFactory for InMemoryLedger {
    fn build(&self, options: ClientOptions) -> Box<dyn HotelManager> {
        let wallet = Wallet::new();
        self.lock().last_wallet = Some(wallet.clone());

        Box::new(MemoryClient {
            ledger: self.clone(),
            options,
            wallet,
        })
    }
}

struct MemoryClient {
    ledger: InMemoryLedger,
    options: ClientOptions,
    wallet: Wallet,
}

enum Change<'a> {
    AddUnitType(&'a UnitTypeDraft),
    RemoveUnitType(&'a str),
    EditUnitType(&'a str, &'a UnitTypeInfo),
    AddImage(&'a str, &'a str),
    RemoveImage(&'a str, u32),
    AddAmenity(&'a str, &'a str),
    RemoveAmenity(&'a str, &'a str),
}

impl Change<'_> {
    fn operation(&self) -> &'static str {
        match self {
            Change::AddUnitType(_) => "addUnitType",
            Change::RemoveUnitType(_) => "removeUnitType",
            Change::EditUnitType(..) => "editUnitType",
            Change::AddImage(..) => "addImageUnitType",
            Change::RemoveImage(..) => "removeImageUnitType",
            Change::AddAmenity(..) => "addAmenity",
            Change::RemoveAmenity(..) => "removeAmenity",
        }
    }

    fn event(&self) -> &'static str {
        match self {
            Change::AddUnitType(_) => "UnitTypeAdded",
            Change::RemoveUnitType(_) => "UnitTypeRemoved",
            Change::EditUnitType(..) => "UnitTypeEdited",
            Change::AddImage(..) => "ImageAdded",
            Change::RemoveImage(..) => "ImageRemoved",
            Change::AddAmenity(..) => "AmenityAdded",
            Change::RemoveAmenity(..) => "AmenityRemoved",
        }
    }

    fn apply(&self, hotel: &mut Hotel) -> Result<(), HotelError> {
        match self {
            Change::AddUnitType(draft) => {
                if hotel.unit_types.contains_key(&draft.name) {
                    return Err(revert(format!("unit type {} already exists", draft.name)));
                }
                hotel
                    .unit_types
                    .insert(draft.name.clone(), UnitType::from((*draft).clone()));
            }
            Change::RemoveUnitType(name) => {
                hotel
                    .unit_types
                    .remove(*name)
                    .ok_or_else(|| unknown_unit_type(name))?;
            }
            Change::EditUnitType(name, info) => {
                let unit_type = unit_type_mut(hotel, name)?;
                unit_type.description = info.description.clone();
                unit_type.min_guests = info.min_guests;
                unit_type.max_guests = info.max_guests;
                unit_type.price = info.price.clone();
            }
            Change::AddImage(name, url) => {
                unit_type_mut(hotel, name)?.images.push(url.to_string());
            }
            Change::RemoveImage(name, index) => {
                let images = &mut unit_type_mut(hotel, name)?.images;
                let index = *index as usize;
                if index >= images.len() {
                    return Err(revert(format!("image index {} out of range", index)));
                }
                images.remove(index);
            }
            Change::AddAmenity(name, amenity) => {
                let amenities = &mut unit_type_mut(hotel, name)?.amenities;
                if amenities.iter().any(|a| a == amenity) {
                    return Err(revert(format!("amenity {} already present", amenity)));
                }
                amenities.push(amenity.to_string());
            }
            Change::RemoveAmenity(name, amenity) => {
                let amenities = &mut unit_type_mut(hotel, name)?.amenities;
                let position = amenities
                    .iter()
                    .position(|a| a == amenity)
                    .ok_or_else(|| revert(format!("amenity {} not present", amenity)))?;
                amenities.remove(position);
            }
        }
        Ok(())
    }
}

fn revert(reason: String) -> HotelError {
    HotelError::Reverted(reason)
}

fn unknown_unit_type(name: &str) -> HotelError {
    revert(format!("unit type {} does not exist", name))
}

fn unit_type_mut<'h>(hotel: &'h mut Hotel, name: &str) -> Result<&'h mut UnitType, HotelError> {
    hotel
        .unit_types
        .get_mut(name)
        .ok_or_else(|| unknown_unit_type(name))
}

impl MemoryClient {
    async fn pause(&self) {
        let delay = self.ledger.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn submit(&self, hotel_address: &str, change: Change<'_>) -> Result<TxReceipt, HotelError> {
        let operation = change.operation();

        // Sign before anything else so the recorded call shows who signed.
        let signer = match self.options.owner {
            Some(owner) => {
                let digest = call_digest(operation, hotel_address, &owner, &self.options.index_address);
                self.wallet
                    .sign(&owner, &digest)
                    .ok()
                    .and_then(|signature| signature.recover_address(&digest).ok())
            }
            None => None,
        };

        self.ledger.lock().calls.push(RecordedCall {
            operation: operation.to_string(),
            hotel: hotel_address.to_string(),
            signer,
        });

        self.pause().await;

        let owner = signer.ok_or_else(|| {
            HotelError::MissingSigner(
                self.options
                    .owner
                    .map(|owner| owner.to_string())
                    .unwrap_or_else(|| "no owner configured".to_string()),
            )
        })?;

        let mut state = self.ledger.lock();

        if let Some(reason) = state.reject_next.take() {
            return Err(revert(reason));
        }

        let address = parse_hotel_address(hotel_address)?;
        let hotel = state
            .hotels
            .get_mut(&address)
            .ok_or_else(|| revert(format!("hotel {} is not registered", address)))?;

        if hotel.manager != owner {
            return Err(revert(format!("{} is not the manager of {}", owner, address)));
        }

        change.apply(hotel)?;

        state.nonce += 1;
        state.block_number += 1;
        let tx_hash = transaction_hash(state.nonce, &address, operation);

        let logs = if state.suppress_logs {
            Vec::new()
        } else {
            vec![Log {
                transaction_hash: tx_hash.clone(),
                event: change.event().to_string(),
                block_number: Some(state.block_number),
            }]
        };
        let receipt = TxReceipt { logs };
        state.receipts.push(receipt.clone());

        debug!(%address, operation, %tx_hash, "Memory ledger applied call");
        Ok(receipt)
    }
}

fn call_digest(operation: &str, hotel: &str, from: &Address, index: &Address) -> [u8; 32] {
    let payload = json!({
        "method": operation,
        "indexAddress": index,
        "from": from,
        "hotel": hotel,
    });
    Keccak256::digest(payload.to_string().as_bytes()).into()
}

fn transaction_hash(nonce: u64, hotel: &Address, operation: &str) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(nonce.to_be_bytes());
    hasher.update(hotel.as_bytes());
    hasher.update(operation.as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

#[async_trait]
impl HotelManager for MemoryClient {
    fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    async fn get_hotel(&self, hotel_address: &str) -> Result<Hotel, HotelError> {
        self.ledger.lock().calls.push(RecordedCall {
            operation: "getHotel".to_string(),
            hotel: hotel_address.to_string(),
            signer: None,
        });

        self.pause().await;

        let address = parse_hotel_address(hotel_address)?;
        self.ledger
            .hotel(&address)
            .ok_or_else(|| revert(format!("hotel {} is not registered", address)))
    }

    async fn add_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &UnitTypeDraft,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::AddUnitType(unit_type)).await
    }

    async fn remove_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::RemoveUnitType(unit_type)).await
    }

    async fn edit_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        info: &UnitTypeInfo,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::EditUnitType(unit_type, info))
            .await
    }

    async fn add_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        url: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::AddImage(unit_type, url)).await
    }

    async fn remove_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        image_index: u32,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::RemoveImage(unit_type, image_index))
            .await
    }

    async fn add_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::AddAmenity(unit_type, amenity))
            .await
    }

    async fn remove_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.submit(hotel_address, Change::RemoveAmenity(unit_type, amenity))
            .await
    }
}
