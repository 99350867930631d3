use super::*;

// Test vector from the Web3 Secret Storage definition (PBKDF2 variant).
const PBKDF2_VECTOR: &str = r#"{
    "crypto": {
        "cipher": "aes-128-ctr",
        "cipherparams": { "iv": "6087dab2f9fdbbfaddc31a909735c1e6" },
        "ciphertext": "5318b4d5bcd28de64ee5559e671353e16f075ecae9f99c7a79a38af5f869aa46",
        "kdf": "pbkdf2",
        "kdfparams": {
            "c": 262144,
            "dklen": 32,
            "prf": "hmac-sha256",
            "salt": "ae3cd4e7013836a3df6bd7241b12db061dbe2c6785853cce422d148a624ce0bd"
        },
        "mac": "517ead924a9d0dc3124507e3393d175ce3ff7c1e96529c6c555ce9e51205e9b2"
    },
    "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
    "version": 3
}"#;

const PBKDF2_VECTOR_KEY: &str = "7a28b5ba57c53603b0b07b56bba752f7784bf506fa95edc395f5cf6c7514fe9d";

#[test]
fn test_decrypt_pbkdf2_vector() {
    let account = decrypt_keystore(PBKDF2_VECTOR, "testpassword")
        .expect("Reference keystore should decrypt with its password");

    assert_eq!(hex::encode(account.secret_bytes()), PBKDF2_VECTOR_KEY);
}

#[test]
fn test_encrypt_then_decrypt_light() {
    let account = Account::generate();
    let keystore = encrypt_keystore(&account, "test123", &EncryptOptions::light())
        .expect("Encryption should succeed");
    let json = keystore.to_json_pretty().unwrap();

    let unlocked = decrypt_keystore(&json, "test123").expect("Correct password should unlock");

    assert_eq!(unlocked.address(), account.address());
}

#[test]
fn test_wrong_password() {
    let account = Account::generate();
    let keystore = encrypt_keystore(&account, "test123", &EncryptOptions::light()).unwrap();

    let result = keystore.decrypt("not-the-password");

    assert!(matches!(result, Err(KeystoreError::WrongPassword)));
}

#[test]
fn test_tampered_or_truncated_mac_is_wrong_password() {
    let account = Account::generate();
    let mut keystore = encrypt_keystore(&account, "test123", &EncryptOptions::light()).unwrap();
    let original = keystore.crypto.mac.clone();

    let flipped = if original.ends_with('0') { '1' } else { '0' };
    keystore.crypto.mac = format!("{}{}", &original[..63], flipped);
    assert!(matches!(keystore.decrypt("test123"), Err(KeystoreError::WrongPassword)));

    keystore.crypto.mac = original[..32].to_string();
    assert!(matches!(keystore.decrypt("test123"), Err(KeystoreError::WrongPassword)));
}

#[test]
fn test_capitalized_crypto_key_accepted() {
    let account = Account::generate();
    let keystore = encrypt_keystore(&account, "pw", &EncryptOptions::light()).unwrap();
    let json = keystore.to_json_pretty().unwrap().replace("\"crypto\"", "\"Crypto\"");

    let unlocked = decrypt_keystore(&json, "pw").expect("Capitalized section should parse");
    assert_eq!(unlocked.address(), account.address());
}

#[test]
fn test_not_json_is_malformed() {
    let result = decrypt_keystore("definitely not a keystore", "pw");
    assert!(matches!(result, Err(KeystoreError::Malformed(_))));
}

#[test]
fn test_unknown_kdf_is_unsupported() {
    let account = Account::generate();
    let mut keystore = encrypt_keystore(&account, "pw", &EncryptOptions::light()).unwrap();
    keystore.crypto.kdf = "argon2id".to_string();

    let result = keystore.decrypt("pw");
    assert!(matches!(result, Err(KeystoreError::Unsupported(_))));
}

#[test]
fn test_declared_address_mismatch() {
    let account = Account::generate();
    let mut keystore = encrypt_keystore(&account, "pw", &EncryptOptions::light()).unwrap();
    keystore.address = Some("0000000000000000000000000000000000000001".to_string());

    let result = keystore.decrypt("pw");
    assert!(matches!(result, Err(KeystoreError::Malformed(_))));
}

#[test]
fn test_excessive_scrypt_cost_rejected() {
    let account = Account::generate();
    let mut keystore = encrypt_keystore(&account, "pw", &EncryptOptions::light()).unwrap();
    keystore.crypto.kdfparams["n"] = serde_json::json!(1u64 << 30);

    let result = keystore.decrypt("pw");
    assert!(matches!(result, Err(KeystoreError::Unsupported(_))));
}
