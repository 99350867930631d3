//! # Wallet Handler
//!
//! `POST /wallet` installs a new owner keystore.
//!
//! ```bash
//! curl -X POST http://localhost:3000/wallet \
//!   -H "Content-Type: application/json" \
//!   -d '{ "password": "...", "wallet": { "version": 3, "crypto": { ... } } }'
//! ```
//!
//! The keystore must unlock with `password`; otherwise the configured file is
//! left untouched. Responds `201 { address }`.

use crate::extract::ValidJson;
use crate::services::KeystoreService;
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, Json};
use lib_auth::KeystoreFile;
use lib_core::{Address, AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct UploadWalletBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub wallet: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponse {
    pub address: Address,
}

#[instrument(skip_all)]
pub async fn upload_wallet(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<UploadWalletBody>,
) -> Result<(StatusCode, Json<WalletResponse>)> {
    let file = KeystoreFile::from_value(body.wallet)
        .map_err(|e| AppError::Validation(format!("wallet: {}", e)))?;

    let keystore = KeystoreService::new(state.config.keystore_path.clone());
    let account = keystore.replace(file, &body.password).await?;

    info!(address = %account.address(), "Owner keystore installed");
    Ok((
        StatusCode::CREATED,
        Json(WalletResponse {
            address: account.address(),
        }),
    ))
}
