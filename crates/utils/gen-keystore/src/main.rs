//! # Keystore Generator
//!
//! Creates a new owner account and writes it as an encrypted keystore.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package gen-keystore --bin gen_keystore -- [output-dir]
//! ```
//!
//! The output directory defaults to the directory of `KEYSTORE_PATH`, or
//! `keys/` when that is not set. The file is named
//! `UTC--<timestamp>--<address>.json`; point `KEYSTORE_PATH` at it or upload
//! it to `POST /wallet`.

use lib_auth::{encrypt_keystore, Account, EncryptOptions};
use lib_utils::{get_env_or, keystore_file_name, now_utc};
use std::io;
use std::path::PathBuf;

const MIN_PASSWORD_LEN: usize = 8;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    println!("============================================");
    println!("  Keystore Generator");
    println!("============================================");
    println!();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_dir);

    let password = prompt("Password for the new keystore: ")?;
    if password.len() < MIN_PASSWORD_LEN {
        anyhow::bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }
    let confirmation = prompt("Repeat password: ")?;
    if confirmation != password {
        anyhow::bail!("Passwords do not match");
    }

    println!();
    println!("Generating account and deriving key (this takes a few seconds)...");

    let account = Account::generate();
    let keystore = encrypt_keystore(&account, &password, &EncryptOptions::default())?;

    std::fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(keystore_file_name(now_utc(), &account.address().to_string()));
    std::fs::write(&path, keystore.to_json_pretty()?)?;

    println!();
    println!("Address:  {}", account.address());
    println!("Keystore: {}", path.display());

    Ok(())
}

fn default_dir() -> PathBuf {
    PathBuf::from(get_env_or("KEYSTORE_PATH", "keys/keystore.json"))
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("keys"))
}

/// Read a password from the terminal without echoing it.
fn prompt(label: &str) -> io::Result<String> {
    rpassword::prompt_password(label).map(|line| strip_line_ending(&line).to_string())
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
