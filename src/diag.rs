//! Diagnostic output of token signing parameters.

use core::fmt;

/// Receiver of diagnostic lines written by a [`TokenSigner`](crate::TokenSigner) in verbose mode.
///
/// Writing cannot fail. A single sink may be shared by signers used from multiple threads,
/// hence the `Send + Sync` bound.
///
/// The trait is implemented for closures, which is handy for collecting output in tests:
///
/// ```
/// # use std::sync::{Arc, Mutex};
/// # use edge_auth_token::{DiagnosticSink, TokenConfig, TokenSigner};
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = {
///     let lines = Arc::clone(&lines);
///     move |line: core::fmt::Arguments<'_>| lines.lock().unwrap().push(line.to_string())
/// };
/// let config = TokenConfig::new("abcd").with_verbose(true);
/// let signer = TokenSigner::new(config).with_sink(sink);
/// signer.sign_acl("/images/*")?;
/// assert!(lines.lock().unwrap().iter().any(|line| line.starts_with("ACL")));
/// # Ok::<_, edge_auth_token::SigningError>(())
/// ```
pub trait DiagnosticSink: Send + Sync {
    /// Writes a single line.
    fn write_line(&self, line: fmt::Arguments<'_>);
}

impl<F> DiagnosticSink for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn write_line(&self, line: fmt::Arguments<'_>) {
        self(line);
    }
}

/// Default [`DiagnosticSink`] emitting lines as `tracing` events at the `INFO` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&self, line: fmt::Arguments<'_>) {
        tracing::info!(target: "edge_auth_token", "{line}");
    }
}
