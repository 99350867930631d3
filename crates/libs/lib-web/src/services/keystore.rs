//! # Keystore Service
//!
//! Reads, unlocks and replaces the owner keystore at `KEYSTORE_PATH`.
//!
//! Key derivation is deliberately slow (scrypt with n = 2^18 for standard
//! keystores), so every decrypt runs on the blocking pool.
//!
//! ## Error Mapping
//!
//! | Failure | Error |
//! |---------|-------|
//! | keystore file missing or unreadable | `Internal` |
//! | wrong password, malformed or unsupported keystore | `Authentication` |
//! | decrypt worker panicked | `Internal` |

use lib_auth::{Account, KeystoreError, KeystoreFile};
use lib_core::{Address, AppError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Debug)]
pub struct KeystoreService {
    path: PathBuf,
}

impl KeystoreService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address the configured keystore declares, read without decrypting.
    ///
    /// `None` when the file is missing, malformed or declares no address.
    pub fn declared_address(&self) -> Option<Address> {
        let json = std::fs::read_to_string(&self.path).ok()?;
        KeystoreFile::from_json(&json).ok()?.address?.parse().ok()
    }

    /// Decrypt the configured keystore with `password`.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn unlock(&self, password: &str) -> Result<Account> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Internal(format!("Cannot read keystore {}: {}", self.path.display(), e))
        })?;

        let file = KeystoreFile::from_json(&json).map_err(|e| {
            warn!("Configured keystore is malformed: {}", e);
            unlock_failed(e)
        })?;

        let account = decrypt(file, password.to_string()).await?.map_err(|e| {
            warn!("Keystore unlock failed: {}", e);
            unlock_failed(e)
        })?;

        debug!(address = %account.address(), "Keystore unlocked");
        Ok(account)
    }

    /// Check that `file` unlocks with `password`, then make it the configured
    /// keystore. The old file is only replaced once the new one is fully written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn replace(&self, file: KeystoreFile, password: &str) -> Result<Account> {
        let json = file
            .to_json_pretty()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let account = decrypt(file, password.to_string()).await?.map_err(|e| match e {
            KeystoreError::Malformed(_) | KeystoreError::Unsupported(_) => {
                AppError::Validation(e.to_string())
            }
            other => unlock_failed(other),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Cannot create {}: {}", parent.display(), e)))?;
        }

        // Staging name is unique per upload.
        let staging = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&staging, json).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(AppError::Internal(format!("Cannot write {}: {}", staging.display(), e)));
        }
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(AppError::Internal(format!("Cannot replace keystore: {}", e)));
        }

        info!(address = %account.address(), "Keystore replaced");
        Ok(account)
    }
}

async fn decrypt(
    file: KeystoreFile,
    password: String,
) -> Result<std::result::Result<Account, KeystoreError>> {
    tokio::task::spawn_blocking(move || file.decrypt(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Keystore worker failed: {}", e)))
}

fn unlock_failed(error: KeystoreError) -> AppError {
    match error {
        KeystoreError::WrongPassword => AppError::Authentication("Wrong password".to_string()),
        other => AppError::Authentication(format!("Unable to unlock keystore: {}", other)),
    }
}
