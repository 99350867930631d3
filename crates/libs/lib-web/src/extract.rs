//! # Validating Extractors
//!
//! Drop-in replacements for `Json` and `Path` whose rejections are
//! [`AppError::Validation`], so a malformed request is answered with the same
//! `{ error, code }` body as every other failure.
//!
//! ```rust,ignore
//! async fn handler(
//!     ValidPath(hotel): ValidPath<String>,
//!     ValidJson(body): ValidJson<PasswordBody>,
//! ) -> Result<Json<TxHashResponse>> { ... }
//! ```

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Path, Request},
    http::request::Parts,
};
use lib_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON body that is deserialized and then checked with [`Validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| AppError::Validation(describe(&errors)))?;
        Ok(ValidJson(value))
    }
}

/// Path parameters whose rejection is a validation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ValidPath(value))
    }
}

/// One `field: message` entry per failed rule, sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut entries: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                if field == "__all__" {
                    message
                } else {
                    format!("{}: {}", field, message)
                }
            })
        })
        .collect();
    entries.sort();
    entries.join("; ")
}
