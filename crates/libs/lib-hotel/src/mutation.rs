//! # Mutations
//!
//! One value per signed operation, so the request pipeline can treat every
//! mutating endpoint the same way.

use crate::client::HotelManager;
use crate::error::HotelError;
use crate::types::{TxReceipt, UnitTypeDraft, UnitTypeInfo};

/// A single signed change to a hotel's unit types.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddUnitType {
        hotel: String,
        unit_type: UnitTypeDraft,
    },
    RemoveUnitType {
        hotel: String,
        unit_type: String,
    },
    EditUnitType {
        hotel: String,
        unit_type: String,
        info: UnitTypeInfo,
    },
    AddImage {
        hotel: String,
        unit_type: String,
        url: String,
    },
    RemoveImage {
        hotel: String,
        unit_type: String,
        index: u32,
    },
    AddAmenity {
        hotel: String,
        unit_type: String,
        amenity: String,
    },
    RemoveAmenity {
        hotel: String,
        unit_type: String,
        amenity: String,
    },
}

impl Mutation {
    /// Client method name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddUnitType { .. } => "addUnitType",
            Mutation::RemoveUnitType { .. } => "removeUnitType",
            Mutation::EditUnitType { .. } => "editUnitType",
            Mutation::AddImage { .. } => "addImageUnitType",
            Mutation::RemoveImage { .. } => "removeImageUnitType",
            Mutation::AddAmenity { .. } => "addAmenity",
            Mutation::RemoveAmenity { .. } => "removeAmenity",
        }
    }

    pub fn hotel(&self) -> &str {
        match self {
            Mutation::AddUnitType { hotel, .. }
            | Mutation::RemoveUnitType { hotel, .. }
            | Mutation::EditUnitType { hotel, .. }
            | Mutation::AddImage { hotel, .. }
            | Mutation::RemoveImage { hotel, .. }
            | Mutation::AddAmenity { hotel, .. }
            | Mutation::RemoveAmenity { hotel, .. } => hotel,
        }
    }

    /// Issue the matching client call.
    pub async fn submit(&self, client: &dyn HotelManager) -> Result<TxReceipt, HotelError> {
        match self {
            Mutation::AddUnitType { hotel, unit_type } => {
                client.add_unit_type(hotel, unit_type).await
            }
            Mutation::RemoveUnitType { hotel, unit_type } => {
                client.remove_unit_type(hotel, unit_type).await
            }
            Mutation::EditUnitType { hotel, unit_type, info } => {
                client.edit_unit_type(hotel, unit_type, info).await
            }
            Mutation::AddImage { hotel, unit_type, url } => {
                client.add_image_unit_type(hotel, unit_type, url).await
            }
            Mutation::RemoveImage { hotel, unit_type, index } => {
                client.remove_image_unit_type(hotel, unit_type, *index).await
            }
            Mutation::AddAmenity { hotel, unit_type, amenity } => {
                client.add_amenity(hotel, unit_type, amenity).await
            }
            Mutation::RemoveAmenity { hotel, unit_type, amenity } => {
                client.remove_amenity(hotel, unit_type, amenity).await
            }
        }
    }
}
