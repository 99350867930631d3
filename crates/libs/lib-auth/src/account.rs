//! # Accounts
//!
//! A decrypted secp256k1 signing key together with its derived address.

use crate::keystore::KeystoreError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use lib_core::Address;
use sha3::{Digest, Keccak256};
use std::fmt;

/// An unlocked owner account.
///
/// The key is zeroized by `k256` when the account is dropped. `Debug` only
/// shows the address.
#[derive(Clone)]
pub struct Account {
    address: Address,
    key: SigningKey,
}

impl Account {
    /// Build an account from a raw 32-byte private key.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, KeystoreError> {
        let key = SigningKey::from_slice(secret)
            .map_err(|_| KeystoreError::InvalidKey)?;
        Ok(Self::from_signing_key(key))
    }

    /// Generate a fresh random account.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut rand::rngs::OsRng))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { address, key }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest, producing an `r || s || v` signature.
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<RecoverableSignature, KeystoreError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(prehash)
            .map_err(|e| KeystoreError::Crypto(e.to_string()))?;

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = recovery_id.to_byte();
        Ok(RecoverableSignature(bytes))
    }

    pub(crate) fn secret_bytes(&self) -> [u8; 32] {
        self.key.to_bytes().into()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("key", &"***REDACTED***")
            .finish()
    }
}

/// Signature with its recovery byte, as sent alongside signed calls.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Recover the address that produced this signature over `prehash`.
    pub fn recover_address(&self, prehash: &[u8; 32]) -> Result<Address, KeystoreError> {
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|e| KeystoreError::Crypto(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(self.0[64])
            .ok_or_else(|| KeystoreError::Crypto("invalid recovery id".to_string()))?;
        let key = VerifyingKey::recover_from_prehash(prehash, &signature, recovery_id)
            .map_err(|e| KeystoreError::Crypto(e.to_string()))?;
        Ok(address_of(&key))
    }
}

impl fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoverableSignature({})", self.to_hex())
    }
}

/// keccak256 over the uncompressed public key (without the 0x04 tag), last 20 bytes.
fn address_of(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash: [u8; 32] = Keccak256::digest(&point.as_bytes()[1..]).into();
    Address::from_hash(&hash)
}
