//! # Hotel Types
//!
//! Wire shapes shared by both client implementations and the HTTP layer.
//! Field names are camelCase on the wire.

use lib_core::Address;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A hotel record as reported by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub address: Address,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub manager: Address,
    /// Unit types keyed by their name
    #[serde(default)]
    pub unit_types: BTreeMap<String, UnitType>,
}

/// A category of rentable unit within a hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitType {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub min_guests: u32,
    #[serde(default)]
    pub max_guests: u32,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub total_units: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A unit type to be added. Only the name is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypeDraft {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_guests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_guests: Option<u32>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
}

impl UnitTypeDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_units: None,
            description: None,
            min_guests: None,
            max_guests: None,
            price: None,
        }
    }
}

impl From<UnitTypeDraft> for UnitType {
    fn from(draft: UnitTypeDraft) -> Self {
        Self {
            name: draft.name,
            description: draft.description.unwrap_or_default(),
            min_guests: draft.min_guests.unwrap_or_default(),
            max_guests: draft.max_guests.unwrap_or_default(),
            price: draft.price.unwrap_or_default(),
            total_units: draft.total_units.unwrap_or_default(),
            amenities: Vec::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

/// Accept `"90"` as well as `90`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(StringOrNumber::into_string)
}

/// [`string_or_number`] for optional fields; `null` is `None`.
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|raw| raw.map(StringOrNumber::into_string))
}

/// Replacement information for an existing unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypeInfo {
    pub description: String,
    pub min_guests: u32,
    pub max_guests: u32,
    pub price: String,
}

/// An event emitted by a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub transaction_hash: String,
    #[serde(default)]
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

/// Result of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl TxReceipt {
    /// Hash carried by the first emitted log, if any log was emitted.
    pub fn first_transaction_hash(&self) -> Option<&str> {
        self.logs.first().map(|log| log.transaction_hash.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_first_hash() {
        let receipt: TxReceipt = serde_json::from_value(json!({
            "logs": [
                { "transactionHash": "0xaa", "event": "UnitTypeAdded" },
                { "transactionHash": "0xbb", "event": "Other" }
            ]
        }))
        .unwrap();

        assert_eq!(receipt.first_transaction_hash(), Some("0xaa"));
        assert_eq!(TxReceipt::default().first_transaction_hash(), None);
    }

    #[test]
    fn test_draft_price_accepts_number() {
        let draft: UnitTypeDraft =
            serde_json::from_value(json!({ "type": "BASIC", "price": 90 })).unwrap();
        assert_eq!(draft.price.as_deref(), Some("90"));

        let draft: UnitTypeDraft =
            serde_json::from_value(json!({ "type": "BASIC", "price": "12.5" })).unwrap();
        assert_eq!(draft.price.as_deref(), Some("12.5"));

        let draft: UnitTypeDraft =
            serde_json::from_value(json!({ "type": "BASIC", "price": null })).unwrap();
        assert_eq!(draft.price, None);
    }

    #[test]
    fn test_draft_wire_names() {
        let draft: UnitTypeDraft =
            serde_json::from_value(json!({ "type": "BASIC", "totalUnits": 5 })).unwrap();

        assert_eq!(draft.name, "BASIC");
        assert_eq!(draft.total_units, Some(5));
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({ "type": "BASIC", "totalUnits": 5 })
        );
    }
}
