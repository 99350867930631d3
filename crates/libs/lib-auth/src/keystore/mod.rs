//! # Keystore Files
//!
//! Reading and writing Web3 Secret Storage (version 3) keystores.
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": 3,
//!   "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
//!   "address": "008aeeda4d805471df9b2a5b0f38a0c3bcba786b",
//!   "crypto": {
//!     "cipher": "aes-128-ctr",
//!     "cipherparams": { "iv": "6087dab2f9fdbbfaddc31a909735c1e6" },
//!     "ciphertext": "5318b4d5bcd28de64ee5559e671353e16f075ecae9f99c7a79a38af5f869aa46",
//!     "kdf": "scrypt",
//!     "kdfparams": { "dklen": 32, "n": 262144, "r": 8, "p": 1, "salt": "ab0c7876..." },
//!     "mac": "517ead924a9d0dc3124507e3393d175ce3ff7c1e96529c6c555ce9e51205e9b2"
//!   }
//! }
//! ```
//!
//! The password derives a 32-byte key (scrypt or PBKDF2-HMAC-SHA256). Its upper
//! half authenticates the ciphertext through a keccak256 MAC, its lower half is
//! the AES-128-CTR key. A MAC mismatch means the password is wrong.

mod kdf;

use crate::account::Account;
use ctr::cipher::{KeyIvInit, StreamCipher};
use lib_core::Address;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;
use thiserror::Error;

pub use kdf::{Pbkdf2Params, ScryptParams};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

const CIPHER: &str = "aes-128-ctr";
const DERIVED_KEY_LEN: usize = 32;

/// Keystore failures.
#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("Malformed keystore: {0}")]
    Malformed(String),

    #[error("Unsupported keystore: {0}")]
    Unsupported(String),

    #[error("Wrong password for keystore")]
    WrongPassword,

    #[error("Keystore does not contain a valid secp256k1 key")]
    InvalidKey,

    #[error("Keystore crypto failure: {0}")]
    Crypto(String),
}

/// On-disk keystore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(alias = "Crypto")]
    pub crypto: CryptoSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSection {
    pub cipher: String,
    pub cipherparams: CipherParams,
    pub ciphertext: String,
    pub kdf: String,
    pub kdfparams: serde_json::Value,
    pub mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

impl KeystoreFile {
    /// Parse a keystore from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, KeystoreError> {
        serde_json::from_str(json).map_err(|e| KeystoreError::Malformed(e.to_string()))
    }

    /// Parse a keystore from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, KeystoreError> {
        serde_json::from_value(value).map_err(|e| KeystoreError::Malformed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, KeystoreError> {
        serde_json::to_string_pretty(self).map_err(|e| KeystoreError::Malformed(e.to_string()))
    }

    /// Unlock the keystore.
    pub fn decrypt(&self, password: &str) -> Result<Account, KeystoreError> {
        if self.version != 3 {
            return Err(KeystoreError::Unsupported(format!("version {}", self.version)));
        }

        let crypto = &self.crypto;
        if !crypto.cipher.eq_ignore_ascii_case(CIPHER) {
            return Err(KeystoreError::Unsupported(format!("cipher {}", crypto.cipher)));
        }

        let derived = kdf::derive_key(&crypto.kdf, &crypto.kdfparams, password.as_bytes())?;
        let mut buffer = decode_hex("ciphertext", &crypto.ciphertext)?;
        let expected_mac = decode_hex("mac", &crypto.mac)?;

        let computed = mac(&derived, &buffer);
        if !bool::from(computed.as_slice().ct_eq(expected_mac.as_slice())) {
            return Err(KeystoreError::WrongPassword);
        }

        let iv = decode_hex("iv", &crypto.cipherparams.iv)?;
        apply_cipher(&derived[..16], &iv, &mut buffer)?;

        let account = Account::from_secret_bytes(&buffer)?;

        if let Some(declared) = &self.address {
            let declared: Address = declared
                .parse()
                .map_err(|e| KeystoreError::Malformed(format!("address: {}", e)))?;
            if declared != account.address() {
                return Err(KeystoreError::Malformed(
                    "declared address does not match the decrypted key".to_string(),
                ));
            }
        }

        Ok(account)
    }
}

/// Tuning for newly written keystores.
#[derive(Debug, Clone)]
pub struct EncryptOptions {
    pub scrypt: ScryptParams,
}

impl Default for EncryptOptions {
    /// The standard geth/web3 cost: n = 2^18, r = 8, p = 1.
    fn default() -> Self {
        Self {
            scrypt: ScryptParams::new(18, 8, 1),
        }
    }
}

impl EncryptOptions {
    /// Cheap parameters (n = 2^10) for tests and throwaway development keys.
    pub fn light() -> Self {
        Self {
            scrypt: ScryptParams::new(10, 8, 1),
        }
    }
}

/// Decrypt keystore JSON text with `password`.
pub fn decrypt_keystore(json: &str, password: &str) -> Result<Account, KeystoreError> {
    KeystoreFile::from_json(json)?.decrypt(password)
}

/// Encrypt `account` under `password` into a version 3 keystore.
pub fn encrypt_keystore(
    account: &Account,
    password: &str,
    options: &EncryptOptions,
) -> Result<KeystoreFile, KeystoreError> {
    let mut rng = rand::rngs::OsRng;
    let mut salt = [0u8; 32];
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let params = options.scrypt.clone().with_salt(&salt);
    let derived = params.derive(password.as_bytes())?;

    let mut buffer = account.secret_bytes().to_vec();
    apply_cipher(&derived[..16], &iv, &mut buffer)?;
    let mac = mac(&derived, &buffer);

    let address = account.address().to_string();
    Ok(KeystoreFile {
        version: 3,
        id: Some(uuid::Uuid::new_v4().to_string()),
        address: Some(address.trim_start_matches("0x").to_string()),
        crypto: CryptoSection {
            cipher: CIPHER.to_string(),
            cipherparams: CipherParams { iv: hex::encode(iv) },
            ciphertext: hex::encode(&buffer),
            kdf: "scrypt".to_string(),
            kdfparams: serde_json::to_value(&params)
                .map_err(|e| KeystoreError::Malformed(e.to_string()))?,
            mac: hex::encode(mac),
        },
    })
}

fn mac(derived: &[u8; DERIVED_KEY_LEN], ciphertext: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(&derived[16..32]);
    hasher.update(ciphertext);
    hasher.finalize().into()
}

fn apply_cipher(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<(), KeystoreError> {
    let mut cipher = Aes128Ctr::new_from_slices(key, iv)
        .map_err(|_| KeystoreError::Malformed("iv must be 16 bytes".to_string()))?;
    cipher.apply_keystream(buffer);
    Ok(())
}

pub(crate) fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, KeystoreError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).map_err(|_| KeystoreError::Malformed(format!("{} is not hex", field)))
}

#[cfg(test)]
mod tests;
