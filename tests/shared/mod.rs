//! Functionality shared by integration tests.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const KEY: &str = "0123456789abcdef0123456789abcdef";

pub fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

/// Fixed clock preceding the reference expiration (1_700_000_000).
pub fn clock() -> DateTime<Utc> {
    timestamp(1_699_990_000)
}

/// Splits a token into its body (with the trailing delimiter) and the hex digest.
pub fn split_token(token: &str) -> (&str, &str) {
    let digest_start = token.rfind("hmac=").expect("no digest in token");
    (&token[..digest_start], &token[(digest_start + 5)..])
}

/// Computes HMAC-SHA256 independently of the crate.
pub fn recompute_digest(hex_key: &str, message: &str) -> String {
    let key = hex::decode(hex_key).unwrap();
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
