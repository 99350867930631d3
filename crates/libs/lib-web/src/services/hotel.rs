//! # Hotel Service
//!
//! Runs one hotel operation on behalf of one request.
//!
//! ## Mutation Pipeline
//!
//! ```text
//! unlock keystore (password) → account
//!     → build fresh client { index, gas margin, owner = account }
//!     → attach account (guard)
//!     → timeout(SDK_TIMEOUT_SECS, mutation)
//!     → drop guard (detach)
//!     → first log's transaction hash
//! ```
//!
//! The guard is dropped before the outcome is inspected, so the account is
//! detached on success, on client error and on timeout alike.
//!
//! ## Error Mapping
//!
//! | Failure | Error |
//! |---------|-------|
//! | keystore (see [`KeystoreService`]) | `Authentication` / `Internal` |
//! | any [`HotelError`] | `Blockchain` |
//! | client call exceeded the timeout | `Blockchain` |
//! | receipt without logs | `Internal` |

use super::keystore::KeystoreService;
use crate::server::AppState;
use axum::extract::FromRef;
use lib_auth::Account;
use lib_core::{AppError, Config, Result};
use lib_hotel::{ClientOptions, HotelError, HotelManagerFactory, Mutation, UnitType};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct HotelService {
    config: Config,
    hotels: Arc<dyn HotelManagerFactory>,
    keystore: KeystoreService,
}

impl FromRef<AppState> for HotelService {
    fn from_ref(state: &AppState) -> Self {
        HotelService::new(state.config.clone(), Arc::clone(&state.hotels))
    }
}

impl HotelService {
    pub fn new(config: Config, hotels: Arc<dyn HotelManagerFactory>) -> Self {
        let keystore = KeystoreService::new(config.keystore_path.clone());
        Self {
            config,
            hotels,
            keystore,
        }
    }

    /// Decrypt the configured keystore.
    pub async fn unlock(&self, password: &str) -> Result<Account> {
        self.keystore.unlock(password).await
    }

    /// Unit types of a hotel, keyed by name.
    #[instrument(skip(self))]
    pub async fn list_unit_types(&self, hotel_address: &str) -> Result<BTreeMap<String, UnitType>> {
        let client = self.hotels.build(self.client_options(None));

        let hotel = self
            .bounded("getHotel", client.get_hotel(hotel_address))
            .await?
            .map_err(blockchain)?;

        debug!(count = hotel.unit_types.len(), "Unit types listed");
        Ok(hotel.unit_types)
    }

    /// Unlock the owner account and submit `mutation` signed by it.
    ///
    /// Returns the transaction hash of the first emitted log.
    #[instrument(skip_all, fields(operation = mutation.name(), hotel = mutation.hotel()))]
    pub async fn execute(&self, password: &str, mutation: Mutation) -> Result<String> {
        let account = self.unlock(password).await?;
        let owner = account.address();

        let client = self.hotels.build(self.client_options(Some(owner)));
        let options = client.options();
        debug!(
            index = %options.index_address,
            gas_margin = options.gas_margin,
            %owner,
            "Client built"
        );
        let signer = client.wallet().attach(account).map_err(blockchain)?;

        let outcome = self
            .bounded(mutation.name(), mutation.submit(client.as_ref()))
            .await;
        drop(signer);

        let receipt = outcome?.map_err(blockchain)?;

        let tx_hash = receipt.first_transaction_hash().ok_or_else(|| {
            AppError::Internal(format!("{} emitted no logs", mutation.name()))
        })?;

        info!(%owner, tx_hash, "Transaction submitted");
        Ok(tx_hash.to_string())
    }

    fn client_options(&self, owner: Option<lib_core::Address>) -> ClientOptions {
        ClientOptions {
            index_address: self.config.index_address,
            gas_margin: self.config.gas_margin,
            owner,
        }
    }

    /// Run a client call under the configured timeout.
    async fn bounded<T>(&self, operation: &str, call: impl Future<Output = T>) -> Result<T> {
        let limit = self.config.sdk_timeout;
        tokio::time::timeout(limit, call).await.map_err(|_| {
            warn!(operation, timeout_secs = limit.as_secs(), "Hotel client call timed out");
            AppError::Blockchain(timeout_message(operation, limit))
        })
    }
}

fn timeout_message(operation: &str, limit: Duration) -> String {
    format!("{} timed out after {}s", operation, limit.as_secs())
}

fn blockchain(error: HotelError) -> AppError {
    AppError::Blockchain(error.to_string())
}
