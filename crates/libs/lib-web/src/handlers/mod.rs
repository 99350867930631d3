//! # HTTP Request Handlers
//!
//! Axum handlers, grouped by resource. Handlers only translate HTTP into a
//! service call and back; the work happens in [`crate::services`].
//!
//! ## Handler Modules
//!
//! - **[`unit_types`]**: unit types of a hotel
//!   - `GET /hotels/{hotelAddress}/unitTypes` - List unit types
//!   - `POST /hotels/{hotelAddress}/unitTypes` - Add a unit type
//!   - `PUT|DELETE /hotels/{hotelAddress}/unitTypes/{unitType}` - Edit or remove
//!   - `POST /hotels/{hotelAddress}/unitTypes/{unitType}/images` - Add an image
//!   - `DELETE /hotels/{hotelAddress}/unitTypes/{unitType}/images/{id}` - Remove an image
//!   - `POST /hotels/{hotelAddress}/unitTypes/{unitType}/amenities` - Add an amenity
//!   - `DELETE /hotels/{hotelAddress}/unitTypes/{unitType}/amenities/{amenity}` - Remove an amenity
//!
//! - **[`wallet`]**: owner keystore
//!   - `POST /wallet` - Install a new keystore
//!
//! ## Error Handling
//!
//! Handlers return `lib_core::Result<T>`. The [`AppError`](lib_core::AppError)
//! variant is picked by the extractor or service that failed and rendered as
//! `{ "error": ..., "code": ... }`.
//!
//! ## Request/Response Flow
//!
//! ```text
//! Client Request
//!     ↓
//! CORS / Trace / Request stamp / Logging / Whitelist
//!     ↓
//! Extractors (ValidPath, ValidJson)
//!     ↓
//! Handler → HotelService
//!     ↓
//! Client Response
//! ```

pub mod unit_types;
pub mod wallet;
