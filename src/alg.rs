//! Digest algorithms used to sign tokens, and the secret key they are keyed with.

use serde::{Deserialize, Serialize};

use core::{fmt, str::FromStr};

use crate::{ParseAlgorithmError, SigningError};

mod hmacs;

pub use self::hmacs::SecretKey;

/// HMAC digest algorithm of a token.
///
/// Only [`Self::Sha256`] is able to sign tokens. The other variants are reserved identifiers
/// recognized by edge servers; signing with them fails with
/// [`SigningError::UnsupportedAlgorithm`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// HMAC-SHA256.
    #[default]
    Sha256,
    /// HMAC-SHA1 (reserved).
    Sha1,
    /// HMAC-MD5 (reserved).
    Md5,
}

impl Algorithm {
    /// Returns the lowercase name of this algorithm.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha1 => "sha1",
            Self::Md5 => "md5",
        }
    }

    /// Checks whether this algorithm can be used to sign tokens.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::Sha256)
    }

    /// Computes the hex-encoded digest of `message` keyed with `key`.
    pub(crate) fn hex_digest(
        self,
        key: &SecretKey,
        message: &[u8],
    ) -> Result<String, SigningError> {
        match self {
            Self::Sha256 => Ok(hex::encode(key.hmac_sha256(message))),
            Self::Sha1 | Self::Md5 => Err(SigningError::UnsupportedAlgorithm(self)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha1" => Ok(Self::Sha1),
            "md5" => Ok(Self::Md5),
            _ => Err(ParseAlgorithmError { name: s.to_owned() }),
        }
    }
}
