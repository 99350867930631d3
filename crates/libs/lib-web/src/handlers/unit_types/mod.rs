//! # Unit Type Handlers
//!
//! HTTP endpoints for the unit types (room categories) of a hotel.
//!
//! ## Endpoints
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | GET | `/hotels/{hotelAddress}/unitTypes` | 200 `{ unitTypes }` |
//! | POST | `/hotels/{hotelAddress}/unitTypes` | 200 `{ txHash }` |
//! | DELETE | `/hotels/{hotelAddress}/unitTypes/{unitType}` | 200 `{ txHash }` |
//! | PUT | `/hotels/{hotelAddress}/unitTypes/{unitType}` | 200 `{ txHash }` |
//! | POST | `/hotels/{hotelAddress}/unitTypes/{unitType}/images` | 200 `{ txHash }` |
//! | DELETE | `/hotels/{hotelAddress}/unitTypes/{unitType}/images/{id}` | 204 |
//! | POST | `/hotels/{hotelAddress}/unitTypes/{unitType}/amenities` | 200 `{ txHash }` |
//! | DELETE | `/hotels/{hotelAddress}/unitTypes/{unitType}/amenities/{amenity}` | 200 `{ txHash }` |
//!
//! Every mutating endpoint takes the keystore `password` in its JSON body.
//! The body is validated before the keystore is touched.
//!
//! ## Request Examples
//!
//! ```bash
//! # List unit types
//! curl http://localhost:3000/hotels/0x6f2f...c1/unitTypes
//!
//! # Add a unit type by name
//! curl -X POST http://localhost:3000/hotels/0x6f2f...c1/unitTypes \
//!   -H "Content-Type: application/json" \
//!   -d '{ "password": "...", "unitType": "BASIC" }'
//!
//! # Edit a unit type
//! curl -X PUT http://localhost:3000/hotels/0x6f2f...c1/unitTypes/BASIC \
//!   -H "Content-Type: application/json" \
//!   -d '{ "password": "...", "description": "Two beds", "minGuests": 1, "maxGuests": 2, "price": "90" }'
//!
//! # Remove the first image
//! curl -X DELETE http://localhost:3000/hotels/0x6f2f...c1/unitTypes/BASIC/images/0 \
//!   -H "Content-Type: application/json" \
//!   -d '{ "password": "..." }'
//! ```

use crate::extract::{ValidJson, ValidPath};
use crate::services::HotelService;
use axum::{extract::State, http::StatusCode, Json};
use lib_core::dto::TxHashResponse;
use lib_core::Result;
use lib_hotel::types::string_or_number;
use lib_hotel::{Mutation, UnitType, UnitTypeDraft, UnitTypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;
use validator::{Validate, ValidationError};

// region: --- Request Bodies

/// Body of endpoints that only need the keystore password.
#[derive(Deserialize, Validate)]
pub struct PasswordBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// A unit type given either as a bare name or as a full object.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitTypeInput {
    Name(String),
    Detailed(UnitTypeDraft),
}

impl UnitTypeInput {
    pub fn into_draft(self) -> UnitTypeDraft {
        match self {
            UnitTypeInput::Name(name) => UnitTypeDraft::named(name),
            UnitTypeInput::Detailed(draft) => draft,
        }
    }

    fn name(&self) -> &str {
        match self {
            UnitTypeInput::Name(name) => name,
            UnitTypeInput::Detailed(draft) => &draft.name,
        }
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddUnitTypeBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(custom(function = "validate_unit_type_input"))]
    pub unit_type: UnitTypeInput,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_guest_bounds"))]
pub struct EditUnitTypeBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub description: String,
    pub min_guests: u32,
    pub max_guests: u32,
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1, message = "price is required"))]
    pub price: String,
}

#[derive(Deserialize, Validate)]
pub struct AddImageBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(url(message = "url must be an absolute URL"))]
    pub url: String,
}

#[derive(Deserialize, Validate)]
pub struct AddAmenityBody {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1, message = "amenity is required"))]
    pub amenity: String,
}

fn validate_unit_type_input(input: &UnitTypeInput) -> std::result::Result<(), ValidationError> {
    if input.name().trim().is_empty() {
        return Err(ValidationError::new("unit_type").with_message("unit type name is required".into()));
    }
    Ok(())
}

fn validate_guest_bounds(body: &EditUnitTypeBody) -> std::result::Result<(), ValidationError> {
    if body.min_guests > body.max_guests {
        return Err(ValidationError::new("guest_bounds")
            .with_message("minGuests must not exceed maxGuests".into()));
    }
    Ok(())
}

// endregion: --- Request Bodies

// region: --- Responses

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypesResponse {
    pub unit_types: BTreeMap<String, UnitType>,
}

// endregion: --- Responses

// region: --- Handlers

/// List the unit types of a hotel.
#[instrument(skip(hotels))]
pub async fn list_unit_types(
    State(hotels): State<HotelService>,
    ValidPath(hotel_address): ValidPath<String>,
) -> Result<Json<UnitTypesResponse>> {
    let unit_types = hotels.list_unit_types(&hotel_address).await?;
    Ok(Json(UnitTypesResponse { unit_types }))
}

#[instrument(skip(hotels, body))]
pub async fn add_unit_type(
    State(hotels): State<HotelService>,
    ValidPath(hotel_address): ValidPath<String>,
    ValidJson(body): ValidJson<AddUnitTypeBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::AddUnitType {
        hotel: hotel_address,
        unit_type: body.unit_type.into_draft(),
    };
    submit(&hotels, &body.password, mutation).await
}

#[instrument(skip(hotels, body))]
pub async fn remove_unit_type(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type)): ValidPath<(String, String)>,
    ValidJson(body): ValidJson<PasswordBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::RemoveUnitType {
        hotel: hotel_address,
        unit_type,
    };
    submit(&hotels, &body.password, mutation).await
}

#[instrument(skip(hotels, body))]
pub async fn edit_unit_type(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type)): ValidPath<(String, String)>,
    ValidJson(body): ValidJson<EditUnitTypeBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::EditUnitType {
        hotel: hotel_address,
        unit_type,
        info: UnitTypeInfo {
            description: body.description,
            min_guests: body.min_guests,
            max_guests: body.max_guests,
            price: body.price,
        },
    };
    submit(&hotels, &body.password, mutation).await
}

#[instrument(skip(hotels, body))]
pub async fn add_image(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type)): ValidPath<(String, String)>,
    ValidJson(body): ValidJson<AddImageBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::AddImage {
        hotel: hotel_address,
        unit_type,
        url: body.url,
    };
    submit(&hotels, &body.password, mutation).await
}

/// Remove the image at index `id`. Answers 204 with no body.
#[instrument(skip(hotels, body))]
pub async fn remove_image(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type, index)): ValidPath<(String, String, u32)>,
    ValidJson(body): ValidJson<PasswordBody>,
) -> Result<StatusCode> {
    let mutation = Mutation::RemoveImage {
        hotel: hotel_address,
        unit_type,
        index,
    };
    hotels.execute(&body.password, mutation).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(hotels, body))]
pub async fn add_amenity(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type)): ValidPath<(String, String)>,
    ValidJson(body): ValidJson<AddAmenityBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::AddAmenity {
        hotel: hotel_address,
        unit_type,
        amenity: body.amenity,
    };
    submit(&hotels, &body.password, mutation).await
}

#[instrument(skip(hotels, body))]
pub async fn remove_amenity(
    State(hotels): State<HotelService>,
    ValidPath((hotel_address, unit_type, amenity)): ValidPath<(String, String, String)>,
    ValidJson(body): ValidJson<PasswordBody>,
) -> Result<Json<TxHashResponse>> {
    let mutation = Mutation::RemoveAmenity {
        hotel: hotel_address,
        unit_type,
        amenity,
    };
    submit(&hotels, &body.password, mutation).await
}

async fn submit(
    hotels: &HotelService,
    password: &str,
    mutation: Mutation,
) -> Result<Json<TxHashResponse>> {
    let tx_hash = hotels.execute(password, mutation).await?;
    Ok(Json(TxHashResponse { tx_hash }))
}

// endregion: --- Handlers

#[cfg(test)]
pub(crate) mod tests;
