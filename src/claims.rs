use smallvec::SmallVec;

use core::fmt;
use std::borrow::Cow;

/// Identifier of a claim in a token body.
///
/// The declaration order of variants is the order in which claims appear in the token.
/// Edge servers rebuild the signed string in the same order, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ClaimKey {
    /// `ip` claim (client IP restriction).
    Ip,
    /// `st` claim (start time, Unix seconds).
    StartTime,
    /// `exp` claim (expiration time, Unix seconds).
    Expiration,
    /// `acl` claim (access control list pattern).
    Acl,
    /// `id` claim (session identifier).
    SessionId,
    /// `data` claim (opaque payload).
    Data,
    /// `url` field. Only a part of the hashed string, never of the token body.
    Url,
}

impl ClaimKey {
    /// Returns the field name of this claim as it appears in tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::StartTime => "st",
            Self::Expiration => "exp",
            Self::Acl => "acl",
            Self::SessionId => "id",
            Self::Data => "data",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Ordered sequence of `key=value` claims forming a token body.
#[derive(Debug, Default)]
pub(crate) struct ClaimSet<'a> {
    fields: SmallVec<[(ClaimKey, Cow<'a, str>); 6]>,
}

impl<'a> ClaimSet<'a> {
    /// Adds a claim. Claims must be pushed in the order of [`ClaimKey`] variants.
    pub fn push(&mut self, key: ClaimKey, value: impl Into<Cow<'a, str>>) -> &mut Self {
        debug_assert!(
            self.fields.last().map_or(true, |(last, _)| *last < key),
            "claim `{key}` pushed out of order"
        );
        self.fields.push((key, value.into()));
        self
    }

    /// Adds a claim if `value` is present and non-empty.
    pub fn push_non_empty(&mut self, key: ClaimKey, value: Option<&'a str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() => self.push(key, value),
            _ => self,
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = ClaimKey> + '_ {
        self.fields.iter().map(|(key, _)| *key)
    }

    /// Writes every claim as `key=value` followed by `delimiter`. The output thus always ends
    /// with a single delimiter.
    pub fn join(&self, delimiter: &str) -> String {
        let mut buffer = String::new();
        for (key, value) in &self.fields {
            buffer.push_str(key.as_str());
            buffer.push('=');
            buffer.push_str(value);
            buffer.push_str(delimiter);
        }
        buffer
    }
}
