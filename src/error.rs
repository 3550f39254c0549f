//! Error handling.

use chrono::{DateTime, Utc};

use core::fmt;

use crate::alg::Algorithm;

/// Errors that can occur during token signing.
#[derive(Debug)]
#[non_exhaustive]
pub enum SigningError {
    /// ACL to sign is empty.
    EmptyAcl,
    /// URL to sign is empty.
    EmptyUrl,
    /// Token expiration precedes its start time, i.e., the token would have already expired
    /// at the moment it becomes valid.
    AlreadyExpired {
        /// Effective start time of the token.
        start: DateTime<Utc>,
        /// Effective expiration time of the token.
        end: DateTime<Utc>,
    },
    /// Expiration computed from the start time and the validity duration is not representable.
    TimeOverflow,
    /// Secret key is not an even-length hexadecimal string.
    MalformedKey(hex::FromHexError),
    /// Algorithm is declared, but cannot be used to sign tokens.
    UnsupportedAlgorithm(Algorithm),
}

impl fmt::Display for SigningError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAcl => formatter.write_str("ACL to sign must not be empty"),
            Self::EmptyUrl => formatter.write_str("URL to sign must not be empty"),
            Self::AlreadyExpired { start, end } => write!(
                formatter,
                "Token will have already expired: expiration ({}) precedes start ({})",
                end.timestamp(),
                start.timestamp()
            ),
            Self::TimeOverflow => formatter.write_str("Token expiration is out of range"),
            Self::MalformedKey(e) => write!(formatter, "Invalid hex string key: {e}"),
            Self::UnsupportedAlgorithm(alg) => {
                write!(formatter, "Algorithm `{alg}` is not supported for signing")
            }
        }
    }
}

impl From<hex::FromHexError> for SigningError {
    fn from(error: hex::FromHexError) -> Self {
        Self::MalformedKey(error)
    }
}

impl std::error::Error for SigningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedKey(e) => Some(e),
            _ => None,
        }
    }
}

/// Error parsing an [`Algorithm`] from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError {
    pub(crate) name: String,
}

impl ParseAlgorithmError {
    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Unknown algorithm `{}`; expected one of `sha256`, `sha1` or `md5`",
            self.name
        )
    }
}

impl std::error::Error for ParseAlgorithmError {}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use std::error::Error as _;

    #[test]
    fn expiration_error_mentions_both_timestamps() {
        let err = SigningError::AlreadyExpired {
            start: Utc.timestamp_opt(1_000, 0).unwrap(),
            end: Utc.timestamp_opt(500, 0).unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("(500)"), "{message}");
        assert!(message.contains("(1000)"), "{message}");
    }

    #[test]
    fn key_error_exposes_source() {
        let err = SigningError::from(hex::decode("xyz").unwrap_err());
        assert!(err.to_string().starts_with("Invalid hex string key"));
        assert!(err.source().is_some());
        assert!(SigningError::EmptyAcl.source().is_none());
    }
}
