//! # Mutation Tests
//!
//! Successful calls for each mutating endpoint.

use super::*;
use serde_json::json;

fn last_log_hash(ctx: &TestContext) -> String {
    let receipts = ctx.ledger.receipts();
    receipts.last().unwrap().logs[0].transaction_hash.clone()
}

#[tokio::test]
async fn test_add_unit_type_returns_first_log_hash() {
    // Arrange
    let ctx = setup();

    // Act
    let (status, body) = send(
        &ctx.app,
        "POST",
        &unit_types_uri(),
        Some(json!({ "password": PASSWORD, "unitType": "BASIC" })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "txHash": last_log_hash(&ctx) }));

    let hotel = ctx.ledger.hotel(&hotel()).unwrap();
    assert!(hotel.unit_types.contains_key("BASIC"));
}

#[tokio::test]
async fn test_add_unit_type_object_form() {
    // Arrange
    let ctx = setup();
    let unit_type = json!({
        "type": "FAMILY",
        "totalUnits": 4,
        "description": "Two rooms",
        "minGuests": 2,
        "maxGuests": 5,
        "price": "120"
    });

    // Act
    let (status, _) = send(
        &ctx.app,
        "POST",
        &unit_types_uri(),
        Some(json!({ "password": PASSWORD, "unitType": unit_type })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);

    let family = ctx.ledger.hotel(&hotel()).unwrap().unit_types["FAMILY"].clone();
    assert_eq!(family.total_units, 4);
    assert_eq!(family.max_guests, 5);
    assert_eq!(family.price, "120");
}

#[tokio::test]
async fn test_add_unit_type_object_form_with_numeric_price() {
    // Arrange
    let ctx = setup();

    // Act
    let (status, body) = send(
        &ctx.app,
        "POST",
        &unit_types_uri(),
        Some(json!({
            "password": PASSWORD,
            "unitType": { "type": "BASIC", "totalUnits": 5, "price": 90 }
        })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "txHash": last_log_hash(&ctx) }));

    let basic = ctx.ledger.hotel(&hotel()).unwrap().unit_types["BASIC"].clone();
    assert_eq!(basic.total_units, 5);
    assert_eq!(basic.price, "90");
}

#[tokio::test]
async fn test_remove_unit_type() {
    // Arrange
    let ctx = setup();
    seed_unit_type(&ctx, "BASIC").await;

    // Act
    let (status, body) = send(
        &ctx.app,
        "DELETE",
        &format!("{}/BASIC", unit_types_uri()),
        Some(json!({ "password": PASSWORD })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["txHash"], json!(last_log_hash(&ctx)));
    assert!(ctx.ledger.hotel(&hotel()).unwrap().unit_types.is_empty());
}

#[tokio::test]
async fn test_edit_unit_type_accepts_numeric_price() {
    // Arrange
    let ctx = setup();
    seed_unit_type(&ctx, "BASIC").await;

    // Act
    let (status, body) = send(
        &ctx.app,
        "PUT",
        &format!("{}/BASIC", unit_types_uri()),
        Some(json!({
            "password": PASSWORD,
            "description": "Sea view",
            "minGuests": 1,
            "maxGuests": 3,
            "price": 90
        })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert!(body["txHash"].as_str().unwrap().starts_with("0x"));

    let basic = ctx.ledger.hotel(&hotel()).unwrap().unit_types["BASIC"].clone();
    assert_eq!(basic.description, "Sea view");
    assert_eq!(basic.min_guests, 1);
    assert_eq!(basic.max_guests, 3);
    assert_eq!(basic.price, "90");
}

#[tokio::test]
async fn test_add_image_then_remove_returns_no_content() {
    // Arrange
    let ctx = setup();
    seed_unit_type(&ctx, "BASIC").await;
    let images_uri = format!("{}/BASIC/images", unit_types_uri());

    let (status, body) = send(
        &ctx.app,
        "POST",
        &images_uri,
        Some(json!({ "password": PASSWORD, "url": "https://images.example.com/basic.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["txHash"], json!(last_log_hash(&ctx)));

    // Act
    let (status, body) = send(
        &ctx.app,
        "DELETE",
        &format!("{}/0", images_uri),
        Some(json!({ "password": PASSWORD })),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert!(ctx.ledger.hotel(&hotel()).unwrap().unit_types["BASIC"].images.is_empty());
}

#[tokio::test]
async fn test_amenity_add_and_remove() {
    // Arrange
    let ctx = setup();
    seed_unit_type(&ctx, "BASIC").await;
    let amenities_uri = format!("{}/BASIC/amenities", unit_types_uri());

    // Act
    let (added, _) = send(
        &ctx.app,
        "POST",
        &amenities_uri,
        Some(json!({ "password": PASSWORD, "amenity": 5 })),
    )
    .await;
    let amenities = ctx.ledger.hotel(&hotel()).unwrap().unit_types["BASIC"].amenities.clone();

    let (removed, body) = send(
        &ctx.app,
        "DELETE",
        &format!("{}/5", amenities_uri),
        Some(json!({ "password": PASSWORD })),
    )
    .await;

    // Assert
    assert_eq!(added, StatusCode::OK);
    assert_eq!(amenities, vec!["5".to_string()]);
    assert_eq!(removed, StatusCode::OK);
    assert_eq!(body["txHash"], json!(last_log_hash(&ctx)));
    assert!(ctx.ledger.hotel(&hotel()).unwrap().unit_types["BASIC"].amenities.is_empty());
}
