//! Password key derivation for keystores.

use super::{decode_hex, KeystoreError, DERIVED_KEY_LEN};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

// Keystores can be uploaded, so cost parameters are bounded. Scrypt memory is
// 128 * r * n bytes; the limit is the standard geth cost (n = 2^18, r = 8).
const MAX_SCRYPT_MEMORY: u64 = 256 * 1024 * 1024;
const MAX_SCRYPT_P: u32 = 4;
const MAX_PBKDF2_ROUNDS: u32 = 10_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryptParams {
    pub dklen: usize,
    pub n: u64,
    pub r: u32,
    pub p: u32,
    pub salt: String,
}

impl ScryptParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Self {
        Self {
            dklen: DERIVED_KEY_LEN,
            n: 1u64 << log_n,
            r,
            p,
            salt: String::new(),
        }
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = hex::encode(salt);
        self
    }

    pub fn derive(&self, password: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], KeystoreError> {
        check_dklen(self.dklen)?;

        if !self.n.is_power_of_two() || self.n < 2 {
            return Err(KeystoreError::Malformed("scrypt n must be a power of two".to_string()));
        }
        self.check_cost()?;
        let log_n = self.n.trailing_zeros();

        let salt = decode_hex("salt", &self.salt)?;
        let params = scrypt::Params::new(log_n as u8, self.r, self.p, DERIVED_KEY_LEN)
            .map_err(|e| KeystoreError::Crypto(e.to_string()))?;

        let mut derived = [0u8; DERIVED_KEY_LEN];
        scrypt::scrypt(password, &salt, &params, &mut derived)
            .map_err(|e| KeystoreError::Crypto(e.to_string()))?;
        Ok(derived)
    }

    /// Scrypt memory in bytes, `None` when it does not fit in a `u64`.
    pub fn memory_bytes(&self) -> Option<u64> {
        128u64.checked_mul(u64::from(self.r))?.checked_mul(self.n)
    }

    fn check_cost(&self) -> Result<(), KeystoreError> {
        let within_memory = self
            .memory_bytes()
            .is_some_and(|bytes| bytes <= MAX_SCRYPT_MEMORY);
        if self.r == 0 || self.p == 0 || self.p > MAX_SCRYPT_P || !within_memory {
            return Err(KeystoreError::Unsupported(format!(
                "scrypt cost n={} r={} p={}",
                self.n, self.r, self.p
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    pub c: u32,
    pub dklen: usize,
    pub prf: String,
    pub salt: String,
}

impl Pbkdf2Params {
    pub fn derive(&self, password: &[u8]) -> Result<[u8; DERIVED_KEY_LEN], KeystoreError> {
        check_dklen(self.dklen)?;

        if self.prf != "hmac-sha256" {
            return Err(KeystoreError::Unsupported(format!("pbkdf2 prf {}", self.prf)));
        }
        if self.c == 0 || self.c > MAX_PBKDF2_ROUNDS {
            return Err(KeystoreError::Unsupported(format!("pbkdf2 rounds {}", self.c)));
        }

        let salt = decode_hex("salt", &self.salt)?;
        let mut derived = [0u8; DERIVED_KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha256>(password, &salt, self.c, &mut derived);
        Ok(derived)
    }
}

fn check_dklen(dklen: usize) -> Result<(), KeystoreError> {
    if dklen != DERIVED_KEY_LEN {
        return Err(KeystoreError::Unsupported(format!("dklen {}", dklen)));
    }
    Ok(())
}

/// Derive the 32-byte key named by `kdf` from `params`.
pub(super) fn derive_key(
    kdf: &str,
    params: &serde_json::Value,
    password: &[u8],
) -> Result<[u8; DERIVED_KEY_LEN], KeystoreError> {
    match kdf {
        "scrypt" => parse::<ScryptParams>(params)?.derive(password),
        "pbkdf2" => parse::<Pbkdf2Params>(params)?.derive(password),
        other => Err(KeystoreError::Unsupported(format!("kdf {}", other))),
    }
}

fn parse<T: serde::de::DeserializeOwned>(params: &serde_json::Value) -> Result<T, KeystoreError> {
    serde_json::from_value(params.clone())
        .map_err(|e| KeystoreError::Malformed(format!("kdfparams: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geth_standard_cost_is_allowed() {
        let params = ScryptParams::new(18, 8, 1);
        assert_eq!(params.memory_bytes(), Some(MAX_SCRYPT_MEMORY));
        assert!(params.check_cost().is_ok());
    }

    #[test]
    fn test_over_budget_scrypt_rejected_before_derivation() {
        // 128 * 32 * 2^20 bytes = 4 GiB
        let params = ScryptParams::new(20, 32, 1).with_salt(&[0u8; 32]);

        let result = params.derive(b"pw");

        assert!(matches!(result, Err(KeystoreError::Unsupported(_))));
    }

    #[test]
    fn test_parallelism_is_capped() {
        let params = ScryptParams::new(10, 8, 16).with_salt(&[0u8; 32]);
        assert!(matches!(params.derive(b"pw"), Err(KeystoreError::Unsupported(_))));
    }

    #[test]
    fn test_memory_overflow_is_rejected() {
        let params = ScryptParams {
            dklen: DERIVED_KEY_LEN,
            n: 1u64 << 62,
            r: u32::MAX,
            p: 1,
            salt: String::new(),
        };
        assert_eq!(params.memory_bytes(), None);
        assert!(matches!(params.check_cost(), Err(KeystoreError::Unsupported(_))));
    }
}
