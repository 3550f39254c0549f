//! Token signing configuration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use core::fmt;

use crate::alg::Algorithm;

/// Default name of the query parameter / cookie carrying the token.
pub const DEFAULT_TOKEN_NAME: &str = "__token__";
/// Default delimiter of token body fields.
pub const DEFAULT_FIELD_DELIMITER: &str = "~";
/// Default delimiter of multiple ACL patterns.
pub const DEFAULT_ACL_DELIMITER: &str = "!";

/// Parameters of token signing.
///
/// The configuration is a plain value: a [`TokenSigner`](crate::TokenSigner) takes it
/// by value and never mutates it, so the same configuration can back any number of tokens.
///
/// # Serialization
///
/// All fields are optional; absent fields take their default values. Timestamps are
/// represented as Unix seconds, and `valid_duration` as a number of seconds.
///
/// ```
/// # use edge_auth_token::{alg::Algorithm, TokenConfig};
/// let config: TokenConfig = serde_json::from_str(r#"{
///     "key": "abcd",
///     "end_time": 1700000000,
///     "escape_early": true
/// }"#)?;
/// assert_eq!(config.algorithm, Algorithm::Sha256);
/// assert_eq!(config.field_delimiter, "~");
/// assert_eq!(config.end_time.unwrap().timestamp(), 1_700_000_000);
/// # Ok::<_, serde_json::Error>(())
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct TokenConfig {
    /// Name of the query parameter / cookie that will carry the token. Not a part
    /// of the signed data.
    pub token_name: String,
    /// Secret key as an even-length hexadecimal string.
    pub key: String,
    /// Digest algorithm.
    pub algorithm: Algorithm,
    /// IP address to restrict the token to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Opaque data embedded into the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Session identifier for single-use tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Start of the token validity. If not set, the token is valid from the moment
    /// of signing, and the start time is not recorded in the token.
    #[serde(skip_serializing_if = "Option::is_none", with = "self::serde_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    /// Expiration of the token. Overrides `valid_duration`.
    #[serde(skip_serializing_if = "Option::is_none", with = "self::serde_timestamp")]
    pub end_time: Option<DateTime<Utc>>,
    /// Validity duration of the token counted from its start. Used if `end_time` is not set.
    #[serde(with = "self::serde_seconds")]
    pub valid_duration: Duration,
    /// Delimiter of token body fields.
    pub field_delimiter: String,
    /// Delimiter of multiple ACL patterns.
    pub acl_delimiter: String,
    /// Whether to percent-encode the token body before computing its digest.
    pub escape_early: bool,
    /// Whether to dump signing parameters to the diagnostic sink.
    pub verbose: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_name: DEFAULT_TOKEN_NAME.to_owned(),
            key: String::new(),
            algorithm: Algorithm::Sha256,
            ip: None,
            payload: None,
            session_id: None,
            start_time: None,
            end_time: None,
            valid_duration: Duration::zero(),
            field_delimiter: DEFAULT_FIELD_DELIMITER.to_owned(),
            acl_delimiter: DEFAULT_ACL_DELIMITER.to_owned(),
            escape_early: false,
            verbose: false,
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TokenConfig")
            .field("token_name", &self.token_name)
            .field("key", &"_")
            .field("algorithm", &self.algorithm)
            .field("ip", &self.ip)
            .field("payload", &self.payload)
            .field("session_id", &self.session_id)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("valid_duration", &self.valid_duration)
            .field("field_delimiter", &self.field_delimiter)
            .field("acl_delimiter", &self.acl_delimiter)
            .field("escape_early", &self.escape_early)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl TokenConfig {
    /// Creates a configuration with the specified hex-encoded secret `key`
    /// and default values for other fields.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Sets the token parameter name.
    pub fn with_token_name(self, token_name: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            ..self
        }
    }

    /// Sets the digest algorithm.
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        Self { algorithm, ..self }
    }

    /// Restricts the token to the specified client IP address.
    pub fn with_ip(self, ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            ..self
        }
    }

    /// Sets opaque data embedded into the token.
    pub fn with_payload(self, payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            ..self
        }
    }

    /// Sets the session identifier.
    pub fn with_session_id(self, session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..self
        }
    }

    /// Sets the start time of the token validity.
    pub fn with_start_time(self, moment: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(moment),
            ..self
        }
    }

    /// Sets the expiration time of the token.
    pub fn with_end_time(self, moment: DateTime<Utc>) -> Self {
        Self {
            end_time: Some(moment),
            ..self
        }
    }

    /// Sets the validity duration of the token.
    pub fn with_valid_duration(self, duration: Duration) -> Self {
        Self {
            valid_duration: duration,
            ..self
        }
    }

    /// Sets the delimiter of token body fields.
    pub fn with_field_delimiter(self, delimiter: impl Into<String>) -> Self {
        Self {
            field_delimiter: delimiter.into(),
            ..self
        }
    }

    /// Sets the delimiter of multiple ACL patterns.
    pub fn with_acl_delimiter(self, delimiter: impl Into<String>) -> Self {
        Self {
            acl_delimiter: delimiter.into(),
            ..self
        }
    }

    /// Sets whether the token body is percent-encoded before computing its digest.
    pub fn with_escape_early(self, escape_early: bool) -> Self {
        Self {
            escape_early,
            ..self
        }
    }

    /// Sets whether signing parameters are dumped to the diagnostic sink.
    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }
}

mod serde_timestamp {
    use chrono::{offset::TimeZone, DateTime, Utc};
    use serde::{
        de::{Error as DeError, Visitor},
        Deserializer, Serializer,
    };

    use core::fmt;

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("UTC timestamp")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            Utc.timestamp_opt(value, 0)
                .single()
                .ok_or_else(|| E::custom("UTC timestamp overflow"))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: DeError,
        {
            let value = i64::try_from(value).map_err(DeError::custom)?;
            self.visit_i64(value)
        }
    }

    struct OptionalTimestampVisitor;

    impl<'de> Visitor<'de> for OptionalTimestampVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("UTC timestamp or null")
        }

        fn visit_none<E: DeError>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: DeError>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_i64(TimestampVisitor).map(Some)
        }
    }

    pub fn serialize<S: Serializer>(
        time: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_i64(time.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        deserializer.deserialize_option(OptionalTimestampVisitor)
    }
}

mod serde_seconds {
    use chrono::Duration;
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Duration::try_seconds(seconds).ok_or_else(|| D::Error::custom("duration overflow"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_config() {
        let config = TokenConfig::new("abcd");
        assert_eq!(config.token_name, "__token__");
        assert_eq!(config.algorithm, Algorithm::Sha256);
        assert_eq!(config.field_delimiter, "~");
        assert_eq!(config.acl_delimiter, "!");
        assert_eq!(config.valid_duration, Duration::zero());
        assert!(config.start_time.is_none() && config.end_time.is_none());
        assert!(!config.escape_early && !config.verbose);
    }

    #[test]
    fn config_serialization() {
        let config = TokenConfig::new("abcd")
            .with_ip("10.0.0.1")
            .with_start_time(Utc.timestamp_opt(1_699_990_000, 0).unwrap())
            .with_valid_duration(Duration::minutes(5))
            .with_algorithm(Algorithm::Md5);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["ip"], "10.0.0.1");
        assert_eq!(json["start_time"], 1_699_990_000);
        assert_eq!(json["valid_duration"], 300);
        assert_eq!(json["algorithm"], "md5");
        assert!(json.get("end_time").is_none());
        assert!(json.get("payload").is_none());

        let restored: TokenConfig = serde_json::from_value(json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn config_deserialization_errors() {
        let err = serde_json::from_str::<TokenConfig>(r#"{"algorithm":"sha512"}"#).unwrap_err();
        assert!(err.to_string().contains("sha512"), "{err}");
        let err = serde_json::from_str::<TokenConfig>(r#"{"end_time":"soon"}"#).unwrap_err();
        assert!(err.to_string().contains("UTC timestamp"), "{err}");
    }

    #[test]
    fn null_timestamps_are_unset() {
        let config: TokenConfig =
            serde_json::from_str(r#"{"key":"abcd","start_time":null,"end_time":null}"#).unwrap();
        assert_eq!(config, TokenConfig::new("abcd"));

        let config: TokenConfig =
            serde_json::from_str(r#"{"key":"abcd","start_time":null,"end_time":1700000000}"#)
                .unwrap();
        assert!(config.start_time.is_none());
        assert_eq!(config.end_time, Utc.timestamp_opt(1_700_000_000, 0).single());
    }

    #[test]
    fn debug_output_hides_key() {
        let config = TokenConfig::new("deadbeef");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("deadbeef"), "{debug_output}");
    }
}
