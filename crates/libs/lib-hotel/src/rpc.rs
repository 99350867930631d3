//! # JSON-RPC Hotel Client
//!
//! Talks to a hotel-manager bridge: a JSON-RPC 2.0 endpoint that owns the
//! contract ABI, gas estimation and transaction submission.
//!
//! ## Methods
//!
//! | Method | Params | Result |
//! |--------|--------|--------|
//! | `hotel_getHotel` | `{ indexAddress, hotel }` | `Hotel` |
//! | `hotel_addUnitType`, `hotel_removeUnitType`, ... | `{ payload, signature }` | `TxReceipt` |
//!
//! For mutating methods `payload` is
//! `{ method, indexAddress, gasMargin, from, hotel, call }` and `signature` is the
//! owner's recoverable signature over keccak256 of the payload serialized as
//! compact JSON with sorted keys. The bridge must check the signature
//! recovers to `from` before submitting.
//!
//! JSON-RPC error code `3` (execution reverted) maps to
//! [`HotelError::Reverted`]; every other code to [`HotelError::Rpc`].

use crate::client::{parse_hotel_address, ClientOptions, HotelManager, HotelManagerFactory};
use crate::error::HotelError;
use crate::types::{Hotel, TxReceipt, UnitTypeDraft, UnitTypeInfo};
use crate::wallet::Wallet;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const REVERT_CODE: i64 = 3;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds [`RpcHotelManager`] clients that share one HTTP connection pool.
#[derive(Clone)]
pub struct RpcHotelManagerFactory {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl RpcHotelManagerFactory {
    pub fn new(url: impl Into<String>) -> Result<Self, HotelError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HotelError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }
}

impl HotelManagerFactory for RpcHotelManagerFactory {
    fn build(&self, options: ClientOptions) -> Box<dyn HotelManager> {
        Box::new(RpcHotelManager {
            http: self.http.clone(),
            url: self.url.clone(),
            next_id: Arc::clone(&self.next_id),
            options,
            wallet: Wallet::new(),
        })
    }
}

/// Hotel client backed by the JSON-RPC bridge.
pub struct RpcHotelManager {
    http: reqwest::Client,
    url: String,
    next_id: Arc<AtomicU64>,
    options: ClientOptions,
    wallet: Wallet,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcHotelManager {
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, HotelError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": [params],
        });

        debug!(id, method, url = %self.url, "JSON-RPC request");

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| HotelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HotelError::Transport(format!("bridge returned HTTP {}", status)));
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| HotelError::MalformedResponse(e.to_string()))?;

        if let Some(error) = body.error {
            warn!(id, method, code = error.code, "JSON-RPC error: {}", error.message);
            return Err(if error.code == REVERT_CODE {
                HotelError::Reverted(error.message)
            } else {
                HotelError::Rpc {
                    code: error.code,
                    message: error.message,
                }
            });
        }

        body.result
            .ok_or_else(|| HotelError::MalformedResponse(format!("{} returned no result", method)))
    }

    /// Sign and submit one mutating call.
    async fn send(&self, method: &str, hotel_address: &str, call: Value) -> Result<TxReceipt, HotelError> {
        let hotel = parse_hotel_address(hotel_address)?;
        let owner = self
            .options
            .owner
            .ok_or_else(|| HotelError::MissingSigner("client was built without an owner".to_string()))?;

        let payload = json!({
            "method": method,
            "indexAddress": self.options.index_address,
            "gasMargin": self.options.gas_margin,
            "from": owner,
            "hotel": hotel,
            "call": call,
        });

        let digest = payload_digest(&payload)?;
        let signature = self.wallet.sign(&owner, &digest)?;

        self.call(
            &format!("hotel_{}", method),
            json!({ "payload": payload, "signature": signature.to_hex() }),
        )
        .await
    }
}

/// keccak256 of the compact JSON form; `serde_json` maps keep keys sorted.
fn payload_digest(payload: &Value) -> Result<[u8; 32], HotelError> {
    let bytes = serde_json::to_vec(payload)
        .map_err(|e| HotelError::MalformedResponse(e.to_string()))?;
    Ok(Keccak256::digest(&bytes).into())
}

#[async_trait]
impl HotelManager for RpcHotelManager {
    fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    async fn get_hotel(&self, hotel_address: &str) -> Result<Hotel, HotelError> {
        let hotel = parse_hotel_address(hotel_address)?;
        self.call(
            "hotel_getHotel",
            json!({ "indexAddress": self.options.index_address, "hotel": hotel }),
        )
        .await
    }

    async fn add_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &UnitTypeDraft,
    ) -> Result<TxReceipt, HotelError> {
        self.send("addUnitType", hotel_address, json!({ "unitType": unit_type }))
            .await
    }

    async fn remove_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.send("removeUnitType", hotel_address, json!({ "unitType": unit_type }))
            .await
    }

    async fn edit_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        info: &UnitTypeInfo,
    ) -> Result<TxReceipt, HotelError> {
        self.send(
            "editUnitType",
            hotel_address,
            json!({
                "unitType": unit_type,
                "description": info.description,
                "minGuests": info.min_guests,
                "maxGuests": info.max_guests,
                "price": info.price,
            }),
        )
        .await
    }

    async fn add_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        url: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.send(
            "addImageUnitType",
            hotel_address,
            json!({ "unitType": unit_type, "url": url }),
        )
        .await
    }

    async fn remove_image_unit_type(
        &self,
        hotel_address: &str,
        unit_type: &str,
        image_index: u32,
    ) -> Result<TxReceipt, HotelError> {
        self.send(
            "removeImageUnitType",
            hotel_address,
            json!({ "unitType": unit_type, "index": image_index }),
        )
        .await
    }

    async fn add_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.send(
            "addAmenity",
            hotel_address,
            json!({ "unitType": unit_type, "amenity": amenity }),
        )
        .await
    }

    async fn remove_amenity(
        &self,
        hotel_address: &str,
        unit_type: &str,
        amenity: &str,
    ) -> Result<TxReceipt, HotelError> {
        self.send(
            "removeAmenity",
            hotel_address,
            json!({ "unitType": unit_type, "amenity": amenity }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_auth::Account;
    use lib_core::Address;

    fn client(owner: Option<Address>) -> Box<dyn HotelManager> {
        RpcHotelManagerFactory::new("http://127.0.0.1:9")
            .expect("Client builds without network access")
            .build(ClientOptions {
                index_address: Address::ZERO,
                gas_margin: 1.5,
                owner,
            })
    }

    #[test]
    fn test_digest_ignores_key_order() {
        let a = json!({ "b": 1, "a": 2 });
        let b = json!({ "a": 2, "b": 1 });
        assert_eq!(payload_digest(&a).unwrap(), payload_digest(&b).unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hotel_address_fails_before_network() {
        let client = client(None);
        let result = client.get_hotel("0xnot-an-address").await;
        assert!(matches!(result, Err(HotelError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_mutation_requires_attached_owner() {
        let account = Account::generate();
        let client = client(Some(account.address()));

        let result = client
            .remove_unit_type("0x00000000000000000000000000000000000000aa", "BASIC")
            .await;

        assert!(matches!(result, Err(HotelError::MissingSigner(_))));
    }
}
