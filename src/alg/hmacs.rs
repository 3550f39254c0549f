//! HMAC keys and digests.

use hmac::{Hmac, Mac as _};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use smallvec::{smallvec, SmallVec};
use zeroize::Zeroize;

use core::fmt;

use crate::SigningError;

/// Byte length of keys created by [`SecretKey::generate()`].
const GENERATED_KEY_LEN: usize = 32;

/// Secret HMAC key shared between the token issuer and the edge server. Zeroed on drop.
#[derive(Clone)]
pub struct SecretKey(SmallVec<[u8; 64]>);

impl fmt::Debug for SecretKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("SecretKey").field(&"_").finish()
    }
}

impl SecretKey {
    /// Generates a random key using a cryptographically secure RNG.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        let mut key = Self(smallvec![0; GENERATED_KEY_LEN]);
        rng.fill_bytes(&mut key.0);
        key
    }

    /// Creates a key from the specified `bytes`.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(bytes.as_ref().into())
    }

    /// Decodes a key from an even-length hexadecimal string, such as one issued by
    /// the edge server configuration.
    pub fn from_hex(hex_key: &str) -> Result<Self, SigningError> {
        let mut bytes = hex::decode(hex_key)?;
        let key = Self::new(&bytes);
        bytes.zeroize();
        Ok(key)
    }

    /// Encodes this key as a lowercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Computes HMAC-SHA256 with this key and the specified `message`.
    pub(crate) fn hmac_sha256(&self, message: &[u8]) -> impl AsRef<[u8]> {
        let mut hmac =
            Hmac::<Sha256>::new_from_slice(&self.0).expect("HMACs work with any key size");
        hmac.update(message);
        hmac.finalize().into_bytes()
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}
