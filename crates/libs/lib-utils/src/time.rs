//! # Time Utilities
//!
//! UTC helpers, including the timestamped file names used for keystores.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Build the conventional keystore file name for `address` created at `time`.
///
/// Produces `UTC--2026-10-19T08-15-02.123456789Z--<address>.json`, the layout
/// written by geth and most wallet tooling. A leading `0x` on `address` is
/// dropped.
pub fn keystore_file_name(time: DateTime<Utc>, address: &str) -> String {
    let address = address.strip_prefix("0x").unwrap_or(address);
    format!(
        "UTC--{}--{}.json",
        time.format("%Y-%m-%dT%H-%M-%S%.9fZ"),
        address
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_keystore_file_name_layout() {
        let time = Utc
            .with_ymd_and_hms(2026, 10, 19, 8, 15, 2)
            .single()
            .expect("Valid timestamp");

        let name = keystore_file_name(time, "0xabcdef0123456789abcdef0123456789abcdef01");

        assert_eq!(
            name,
            "UTC--2026-10-19T08-15-02.000000000Z--abcdef0123456789abcdef0123456789abcdef01.json"
        );
    }
}
