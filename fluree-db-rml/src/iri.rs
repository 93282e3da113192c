//! IRI-safe encoding of template values
//!
//! A value substituted into an IRI template must not change the structure of
//! the IRI. Every character outside the RFC 3987 `iunreserved` production is
//! percent-encoded over its UTF-8 bytes; letters, digits, `-`, `.`, `_`, `~`
//! and the non-ASCII `ucschar` ranges are kept as is.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// ASCII characters that are not `unreserved`
const IRI_UNSAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `raw` for use as an IRI component
pub fn to_iri_safe(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;

    while !rest.is_empty() {
        // ASCII and non-ucschar characters go through the encoder;
        // ucschar runs are copied verbatim.
        let split = rest.find(is_ucschar).unwrap_or(rest.len());
        let (encoded, tail) = rest.split_at(split);
        result.extend(utf8_percent_encode(encoded, IRI_UNSAFE));

        let keep = tail.find(|c| !is_ucschar(c)).unwrap_or(tail.len());
        result.push_str(&tail[..keep]);
        rest = &tail[keep..];
    }

    result
}

/// RFC 3987 `ucschar`
fn is_ucschar(c: char) -> bool {
    let cp = u32::from(c);
    match cp {
        0xA0..=0xD7FF | 0xF900..=0xFDCF | 0xFDF0..=0xFFEF => true,
        // Planes 1 through 14, excluding the last two code points of each
        0x1_0000..=0xE_FFFF => (cp & 0xFFFF) <= 0xFFFD,
        _ => false,
    }
}
