//! Token signer.

use chrono::{DateTime, Utc};

use core::fmt;
use std::{borrow::Cow, sync::Arc};

use crate::{
    alg::SecretKey,
    claims::{ClaimKey, ClaimSet},
    diag::{DiagnosticSink, TracingSink},
    escape::escape_path,
    SigningError, TokenConfig,
};

/// Resource protected by a token.
#[derive(Debug, Clone, Copy)]
enum Resource<'a> {
    /// ACL pattern; recorded in the token body.
    Acl(&'a str),
    /// Concrete URL path; only folded into the hashed string.
    Url(&'a str),
}

impl Resource<'_> {
    fn mode(self) -> &'static str {
        match self {
            Self::Acl(_) => "acl",
            Self::Url(_) => "url",
        }
    }
}

/// Signer of edge authorization tokens.
///
/// A signer combines a [`TokenConfig`], a clock used to resolve the default token start,
/// and a [`DiagnosticSink`] receiving parameter dumps in verbose mode. Signing is stateless,
/// so a single signer can be shared across threads.
///
/// # Token format
///
/// A token is a sequence of `key=value` claims, each followed by the field delimiter
/// (`~` by default), and terminated by the `hmac` field:
///
/// ```text
/// [ip=..~][st=..~]exp=..~[acl=..~][id=..~][data=..~]hmac=<hex digest>
/// ```
///
/// Claims always appear in this order. The digest covers the token body without
/// its trailing delimiter; for [URL tokens](Self::sign_url()), the body is followed
/// by a `url=<path>` field which is signed but not included into the token.
///
/// # Examples
///
/// ```
/// # use chrono::{TimeZone, Utc};
/// # use edge_auth_token::{TokenConfig, TokenSigner};
/// # fn main() -> anyhow::Result<()> {
/// let config = TokenConfig::new("abcd")
///     .with_end_time(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
/// // Fix the clock so that the token is reproducible.
/// let signer = TokenSigner::with_clock(config, || Utc.timestamp_opt(1_699_990_000, 0).unwrap());
/// let token = signer.sign_acl("/images/*")?;
/// assert_eq!(
///     token,
///     "exp=1700000000~acl=/images/*~\
///      hmac=7e175f77e32682fcb721083837c65e9589d4dbbc33bf59e2632780e9820b36fa"
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenSigner<F = fn() -> DateTime<Utc>> {
    config: TokenConfig,
    clock_fn: F,
    sink: Arc<dyn DiagnosticSink>,
}

impl<F> fmt::Debug for TokenSigner<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TokenSigner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "clock")]
#[cfg_attr(docsrs, doc(cfg(feature = "clock")))]
impl TokenSigner {
    /// Creates a signer with the specified configuration. The clock source is [`Utc::now()`].
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Utc::now)
    }
}

impl<F: Fn() -> DateTime<Utc>> TokenSigner<F> {
    /// Creates a signer based on the specified configuration and clock function.
    pub fn with_clock(config: TokenConfig, clock_fn: F) -> Self {
        Self {
            config,
            clock_fn,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink used in verbose mode. By default, [`TracingSink`] is used.
    pub fn with_sink(self, sink: impl DiagnosticSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            ..self
        }
    }

    /// Returns the configuration of this signer.
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Returns the name of the query parameter / cookie that should carry signed tokens.
    pub fn token_name(&self) -> &str {
        &self.config.token_name
    }

    /// Signs a token for the specified ACL pattern (e.g., `/videos/*`).
    ///
    /// # Errors
    ///
    /// Returns an error if `acl` is empty, if the token would have already expired, if
    /// the configured key is not valid hex, or if the configured algorithm is not supported.
    pub fn sign_acl(&self, acl: &str) -> Result<String, SigningError> {
        if acl.is_empty() {
            return Err(SigningError::EmptyAcl);
        }
        self.sign(Resource::Acl(acl))
    }

    /// Signs a token for several ACL patterns, joining them with the configured
    /// ACL delimiter. Empty patterns are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::EmptyAcl`] if there are no non-empty patterns; otherwise,
    /// same as for [`Self::sign_acl()`].
    pub fn sign_acls<I>(&self, acls: I) -> Result<String, SigningError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut joined = String::new();
        for acl in acls {
            let acl = acl.as_ref();
            if acl.is_empty() {
                continue;
            }
            if !joined.is_empty() {
                joined.push_str(&self.config.acl_delimiter);
            }
            joined.push_str(acl);
        }
        self.sign_acl(&joined)
    }

    /// Signs a token for the specified URL path. The path is covered by the digest,
    /// but is not recorded in the token.
    ///
    /// # Errors
    ///
    /// Same as for [`Self::sign_acl()`].
    pub fn sign_url(&self, url: &str) -> Result<String, SigningError> {
        if url.is_empty() {
            return Err(SigningError::EmptyUrl);
        }
        self.sign(Resource::Url(url))
    }

    fn sign(&self, resource: Resource<'_>) -> Result<String, SigningError> {
        let config = &self.config;
        let start = config.start_time.unwrap_or_else(|| (self.clock_fn)());
        let end = match config.end_time {
            Some(end) => end,
            None => start
                .checked_add_signed(config.valid_duration)
                .ok_or(SigningError::TimeOverflow)?,
        };
        if end < start {
            return Err(SigningError::AlreadyExpired { start, end });
        }

        if config.verbose {
            self.dump_parameters(resource);
        }

        let mut claims = ClaimSet::default();
        claims.push_non_empty(ClaimKey::Ip, config.ip.as_deref());
        // Only an explicitly set start is recorded.
        if config.start_time.is_some() {
            claims.push(ClaimKey::StartTime, start.timestamp().to_string());
        }
        claims.push(ClaimKey::Expiration, end.timestamp().to_string());
        if let Resource::Acl(acl) = resource {
            claims.push(ClaimKey::Acl, acl);
        }
        claims
            .push_non_empty(ClaimKey::SessionId, config.session_id.as_deref())
            .push_non_empty(ClaimKey::Data, config.payload.as_deref());

        let delimiter = config.field_delimiter.as_str();
        let mut body = claims.join(delimiter);
        let mut trailing_delimiter = Cow::Borrowed(delimiter);
        if config.escape_early {
            body = escape_path(&body).into_owned();
            trailing_delimiter = escape_path(delimiter);
        }

        let algorithm = config.algorithm;
        if !algorithm.is_supported() {
            return Err(SigningError::UnsupportedAlgorithm(algorithm));
        }
        let key = SecretKey::from_hex(&config.key)?;
        let digest = {
            let hash_source = match resource {
                Resource::Acl(_) => Cow::Borrowed(
                    body.strip_suffix(&*trailing_delimiter)
                        .unwrap_or(body.as_str()),
                ),
                Resource::Url(url) => Cow::Owned(format!("{body}{}={url}", ClaimKey::Url)),
            };
            algorithm.hex_digest(&key, hash_source.as_bytes())?
        };

        tracing::debug!(
            mode = resource.mode(),
            expiration = end.timestamp(),
            "signed edge token"
        );
        body.push_str("hmac=");
        body.push_str(&digest);
        Ok(body)
    }

    fn dump_parameters(&self, resource: Resource<'_>) {
        let config = &self.config;
        let sink = &*self.sink;
        let timestamp = |time: Option<DateTime<Utc>>| {
            time.map_or_else(String::new, |t| t.timestamp().to_string())
        };

        sink.write_line(format_args!("Edge token generation parameters"));
        match resource {
            Resource::Acl(acl) => sink.write_line(format_args!("ACL             : {acl}")),
            Resource::Url(url) => sink.write_line(format_args!("URL             : {url}")),
        }
        sink.write_line(format_args!("Token name      : {}", config.token_name));
        sink.write_line(format_args!(
            "Key/Secret      : <{} hex digits>",
            config.key.len()
        ));
        sink.write_line(format_args!("Algorithm       : {}", config.algorithm));
        sink.write_line(format_args!(
            "IP              : {}",
            config.ip.as_deref().unwrap_or_default()
        ));
        sink.write_line(format_args!(
            "Payload         : {}",
            config.payload.as_deref().unwrap_or_default()
        ));
        sink.write_line(format_args!(
            "Session ID      : {}",
            config.session_id.as_deref().unwrap_or_default()
        ));
        sink.write_line(format_args!(
            "Start time      : {}",
            timestamp(config.start_time)
        ));
        sink.write_line(format_args!(
            "Valid duration  : {}s",
            config.valid_duration.num_seconds()
        ));
        sink.write_line(format_args!("End time        : {}", timestamp(config.end_time)));
        sink.write_line(format_args!("Field delimiter : {}", config.field_delimiter));
        sink.write_line(format_args!("ACL delimiter   : {}", config.acl_delimiter));
        sink.write_line(format_args!("Escape early    : {}", config.escape_early));
    }
}
