//! Signed authorization tokens for content protected by an edge server / CDN.
//!
//! A token grants access to a resource (an ACL pattern such as `/videos/*`, or a concrete URL
//! path) until its expiration. Tokens consist of `key=value` claims joined by a field
//! delimiter and terminated by an HMAC digest keyed with a secret shared with the edge server:
//!
//! ```text
//! ip=10.0.0.1~st=1699990000~exp=1700000000~acl=/videos/*~id=42~data=x~hmac=<hex digest>
//! ```
//!
//! The edge server rebuilds the signed string from the token, so claim order, delimiters
//! and escaping are a part of the contract and are reproduced exactly.
//!
//! # Design choices
//!
//! - Signing parameters are a plain [`TokenConfig`] value owned by the caller. A [`TokenSigner`]
//!   never mutates it, so a signer can be shared between threads.
//! - The digest algorithm is a closed [`Algorithm`](alg::Algorithm) enum. Declared
//!   algorithms that cannot sign are rejected with an error rather than producing
//!   an empty digest.
//! - Diagnostic output of signing parameters goes to an injected [`DiagnosticSink`];
//!   by default, lines are emitted as [`tracing`] events.
//! - The clock used to resolve the default token start is injectable, which makes signing
//!   fully reproducible in tests.
//!
//! # Crate features
//!
//! - `clock` (on by default) enables getting the current time using `Utc::now()`
//!   from [`chrono`]. Without it, [`TokenSigner::new()`] is not available; use
//!   [`TokenSigner::with_clock()`] instead.
//!
//! [`tracing`]: https://docs.rs/tracing/
//! [`chrono`]: https://docs.rs/chrono/
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use edge_auth_token::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let start = Utc.timestamp_opt(1_699_990_000, 0).unwrap();
//! let config = TokenConfig::new("0123456789abcdef0123456789abcdef")
//!     .with_ip("10.0.0.1")
//!     .with_start_time(start)
//!     .with_valid_duration(Duration::seconds(10_000))
//!     .with_session_id("session-42")
//!     .with_payload("opaque");
//! let signer = TokenSigner::new(config);
//!
//! let token = signer.sign_acl("/videos/*")?;
//! assert!(token.starts_with(
//!     "ip=10.0.0.1~st=1699990000~exp=1700000000~acl=/videos/*~id=session-42~data=opaque~hmac="
//! ));
//! // The token is passed to the edge server in a query parameter or a cookie.
//! let query = format!("{}={token}", signer.token_name());
//! assert!(query.starts_with("__token__=ip=10.0.0.1~"));
//!
//! // URL tokens sign a concrete path, which is not recorded in the token itself.
//! let token = signer.sign_url("/videos/intro.mp4")?;
//! assert!(!token.contains("intro.mp4"));
//! # Ok(())
//! # } // end main()
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/edge-auth-token/0.1.0")]
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod alg;
mod claims;
mod config;
mod diag;
mod error;
mod escape;
mod signer;

/// Prelude to neatly import all necessary stuff from the crate.
pub mod prelude {
    pub use crate::{alg::Algorithm, SigningError, TokenConfig, TokenSigner};
}

pub use crate::{
    claims::ClaimKey,
    config::{TokenConfig, DEFAULT_ACL_DELIMITER, DEFAULT_FIELD_DELIMITER, DEFAULT_TOKEN_NAME},
    diag::{DiagnosticSink, TracingSink},
    error::{ParseAlgorithmError, SigningError},
    escape::escape_path,
    signer::TokenSigner,
};
