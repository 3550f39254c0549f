//! Tests for signing with configuration loaded from JSON.

use assert_matches::assert_matches;
use serde_json::json;

mod shared;

use crate::shared::{clock, recompute_digest, split_token, KEY};
use edge_auth_token::prelude::*;

#[test]
fn signing_with_deserialized_config() {
    let config: TokenConfig = serde_json::from_value(json!({
        "token_name": "hdnts",
        "key": KEY,
        "ip": "10.0.0.1",
        "start_time": 1_699_990_000,
        "valid_duration": 10_000,
        "session_id": "session-42",
        "payload": "opaque",
    }))
    .unwrap();

    let signer = TokenSigner::new(config);
    assert_eq!(signer.token_name(), "hdnts");
    let token = signer.sign_acl("/videos/*").unwrap();
    assert_eq!(
        token,
        "ip=10.0.0.1~st=1699990000~exp=1700000000~acl=/videos/*~id=session-42~data=opaque~\
         hmac=c64f767fb545489f34f5efeef24bb93450acf80cb73ff02279d3c747320837f7"
    );
}

#[test]
fn acl_delimiter_from_config() {
    let config: TokenConfig = serde_json::from_value(json!({
        "key": KEY,
        "end_time": 1_700_000_000,
        "acl_delimiter": ",",
    }))
    .unwrap();
    let token = TokenSigner::with_clock(config, clock)
        .sign_acls(["/a/*", "/b/*"])
        .unwrap();

    let (body, digest) = split_token(&token);
    assert_eq!(body, "exp=1700000000~acl=/a/*,/b/*~");
    assert_eq!(digest, recompute_digest(KEY, "exp=1700000000~acl=/a/*,/b/*"));
}

#[test]
fn reserved_algorithm_from_config() {
    let config: TokenConfig = serde_json::from_value(json!({
        "key": KEY,
        "algorithm": "md5",
    }))
    .unwrap();
    let err = TokenSigner::new(config).sign_acl("/a/*").unwrap_err();
    assert_matches!(err, SigningError::UnsupportedAlgorithm(Algorithm::Md5));
    assert_eq!(err.to_string(), "Algorithm `md5` is not supported for signing");
}
