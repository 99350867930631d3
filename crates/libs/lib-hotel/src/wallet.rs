//! # Signer Set
//!
//! The accounts a client may sign with. Accounts enter through
//! [`Wallet::attach`], which hands back a [`SignerGuard`]; dropping the guard
//! removes the account again. There is no other way to remove one, so every
//! exit path of the code holding the guard (success, `?`, timeout,
//! cancellation) detaches it.

use crate::error::HotelError;
use lib_auth::{Account, RecoverableSignature};
use lib_core::Address;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Signer set owned by one client. Clones share the same set.
#[derive(Clone, Default)]
pub struct Wallet {
    signers: Arc<RwLock<HashMap<Address, Account>>>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `account` to the set for as long as the returned guard lives.
    pub fn attach(&self, account: Account) -> Result<SignerGuard, HotelError> {
        let address = account.address();
        let mut signers = self.write();
        if signers.contains_key(&address) {
            return Err(HotelError::DuplicateSigner(address.to_string()));
        }
        signers.insert(address, account);
        debug!(%address, "Signer attached");

        Ok(SignerGuard {
            wallet: self.clone(),
            address,
        })
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.read().keys().copied().collect()
    }

    /// Sign `prehash` with the attached account for `from`.
    pub fn sign(&self, from: &Address, prehash: &[u8; 32]) -> Result<RecoverableSignature, HotelError> {
        let signers = self.read();
        let account = signers
            .get(from)
            .ok_or_else(|| HotelError::MissingSigner(from.to_string()))?;
        account
            .sign_prehash(prehash)
            .map_err(|e| HotelError::MissingSigner(format!("{}: {}", from, e)))
    }

    fn detach(&self, address: &Address) -> bool {
        self.write().remove(address).is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Address, Account>> {
        self.signers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Address, Account>> {
        self.signers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps one account attached to a [`Wallet`]; detaches it on drop.
#[must_use = "the signer is detached as soon as the guard is dropped"]
pub struct SignerGuard {
    wallet: Wallet,
    address: Address,
}

impl SignerGuard {
    pub fn address(&self) -> Address {
        self.address
    }
}

impl Drop for SignerGuard {
    fn drop(&mut self) {
        if self.wallet.detach(&self.address) {
            debug!(address = %self.address, "Signer detached");
        }
    }
}
