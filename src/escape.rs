//! Percent-encoding of token bodies.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use std::borrow::Cow;

/// Bytes left as-is when escaping a path segment: unreserved characters plus the sub-delimiters
/// that edge servers keep literal in a path segment. Notably, `/`, `;`, `,` and `?` are encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Percent-encodes every byte of `s` outside the path segment safe set, using uppercase hex
/// digits. Returns the input unchanged (borrowed) if it contains nothing to encode.
pub fn escape_path(s: &str) -> Cow<'_, str> {
    utf8_percent_encode(s, PATH_SEGMENT).into()
}
