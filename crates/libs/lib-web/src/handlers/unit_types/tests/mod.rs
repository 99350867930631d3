//! # Unit Type Handler Tests
//!
//! Drives the full router against an [`InMemoryLedger`] and a keystore
//! written to a temporary file.

mod mutations;

use crate::server::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use lib_auth::{encrypt_keystore, Account, EncryptOptions};
use lib_core::{Address, Config, ManagerMode};
use lib_hotel::{ClientOptions, HotelManager, HotelManagerFactory, InMemoryLedger, UnitTypeDraft};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";
pub const HOTEL: &str = "0x00000000000000000000000000000000000000aa";

/// Router, ledger and keystore for one test. The keystore file is removed on drop.
pub struct TestContext {
    pub app: Router,
    pub ledger: InMemoryLedger,
    pub manager: Account,
    pub keystore_path: PathBuf,
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.keystore_path);
    }
}

pub fn temp_keystore_path() -> PathBuf {
    std::env::temp_dir().join(format!("hotel-api-test-{}.json", uuid::Uuid::new_v4()))
}

/// Encrypt `account` under `password` into `path`, replacing any previous file.
pub fn write_keystore(path: &Path, account: &Account, password: &str) {
    let file = encrypt_keystore(account, password, &EncryptOptions::light())
        .expect("Encrypting a test keystore should succeed");
    std::fs::write(path, file.to_json_pretty().unwrap()).expect("Writing test keystore should succeed");
}

pub fn test_config(keystore_path: PathBuf) -> Config {
    Config {
        bind_address: "127.0.0.1:0".to_string(),
        rpc_url: "http://localhost:8545".to_string(),
        index_address: Address::ZERO,
        gas_margin: 1.5,
        keystore_path,
        sdk_timeout: Duration::from_secs(5),
        whitelist: Vec::new(),
        manager_mode: ManagerMode::Memory,
        memory_hotels: Vec::new(),
        allowed_origins: Vec::new(),
    }
}

pub fn test_app(config: Config, ledger: &InMemoryLedger) -> Router {
    create_router(AppState::new(config, Arc::new(ledger.clone())))
}

/// One registered hotel managed by the keystore's account.
pub fn setup() -> TestContext {
    setup_with(|config| config)
}

pub fn setup_with(adjust: impl FnOnce(Config) -> Config) -> TestContext {
    let ledger = InMemoryLedger::new();
    let manager = Account::generate();
    ledger.register_hotel(hotel(), manager.address(), "Seaside", "Test hotel");

    let keystore_path = temp_keystore_path();
    write_keystore(&keystore_path, &manager, PASSWORD);

    let app = test_app(adjust(test_config(keystore_path.clone())), &ledger);

    TestContext {
        app,
        ledger,
        manager,
        keystore_path,
    }
}

pub fn hotel() -> Address {
    HOTEL.parse().unwrap()
}

/// Add a unit type directly through the ledger, bypassing HTTP.
pub async fn seed_unit_type(ctx: &TestContext, name: &str) {
    let client = ctx.ledger.build(ClientOptions {
        index_address: Address::ZERO,
        gas_margin: 1.0,
        owner: Some(ctx.manager.address()),
    });
    let _signer = client.wallet().attach(ctx.manager.clone()).unwrap();
    client
        .add_unit_type(HOTEL, &UnitTypeDraft::named(name))
        .await
        .expect("Seeding a unit type should succeed");
}

/// Send one request; returns the status and the JSON body (`Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}

pub fn unit_types_uri() -> String {
    format!("/hotels/{}/unitTypes", HOTEL)
}
