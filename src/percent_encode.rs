//! Percent encoding.

use std::borrow::Cow;
use std::fmt;

use crate::scan::find_pct_triplet;

/// Predicate deciding whether a character can be written without encoding.
pub type CharPredicate = fn(char) -> bool;

/// Percent-decodes the given string.
///
/// `%XX` triplets are decoded into bytes, and the whole byte sequence is
/// decoded as UTF-8.
/// Invalid UTF-8 sequences are replaced with U+FFFD REPLACEMENT CHARACTER,
/// and percent signs not followed by two hexadecimal digits are left as is.
///
/// # Examples
///
/// ```
/// use url_canon::percent_encode::percent_decode;
///
/// assert_eq!(percent_decode("ex%61mple.com"), "example.com");
/// assert_eq!(percent_decode("%CE%B1.example"), "\u{03B1}.example");
/// assert_eq!(percent_decode("100%"), "100%");
/// assert_eq!(percent_decode("%FF"), "\u{FFFD}");
/// ```
#[must_use]
pub fn percent_decode(s: &str) -> Cow<'_, str> {
    percent_encoding::percent_decode_str(s).decode_utf8_lossy()
}

/// A proxy to percent-encode a string.
///
/// Characters rejected by the predicate are written as `%XX` triplets, one
/// triplet for each byte of their UTF-8 representation, with uppercase
/// hexadecimal digits.
/// Already valid percent-encoded triplets are written as is, so encoding is
/// idempotent.
/// A percent sign which does not start a triplet is encoded to `%25`.
///
/// # Examples
///
/// ```
/// use url_canon::char::is_uric;
/// use url_canon::percent_encode::PercentEncoded;
///
/// let encoded = PercentEncoded::new("a b/%41%z\u{03B1}", is_uric);
/// assert_eq!(encoded.to_string(), "a%20b/%41%25z%CE%B1");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PercentEncoded<'a> {
    /// Raw string before being encoded.
    raw: &'a str,
    /// Characters to be written as is.
    predicate: CharPredicate,
}

impl<'a> PercentEncoded<'a> {
    /// Creates a new proxy.
    #[inline]
    #[must_use]
    pub fn new(raw: &'a str, predicate: CharPredicate) -> Self {
        Self { raw, predicate }
    }

    /// Returns true if encoding the string would change nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        let mut rest = self.raw;
        while !rest.is_empty() {
            let (prefix, after) = match find_pct_triplet(rest) {
                Some((start, end)) => (&rest[..start], &rest[end..]),
                None => (rest, ""),
            };
            if !prefix.chars().all(self.predicate) {
                return false;
            }
            rest = after;
        }
        true
    }

    /// Writes the characters with encoding if necessary.
    fn write_filtered<W: fmt::Write>(&self, writer: &mut W, s: &str) -> fmt::Result {
        s.chars().try_for_each(|c| {
            if (self.predicate)(c) {
                writer.write_char(c)
            } else {
                write_pct_encoded_char(writer, c)
            }
        })
    }
}

impl fmt::Display for PercentEncoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.raw;
        while let Some((start, end)) = find_pct_triplet(rest) {
            self.write_filtered(f, &rest[..start])?;
            f.write_str(&rest[start..end])?;
            rest = &rest[end..];
        }
        self.write_filtered(f, rest)
    }
}

/// Percent-encodes the given string, keeping the characters accepted by the
/// predicate and valid percent-encoded triplets.
///
/// Returns the input as is if nothing needs to be encoded.
///
/// # Examples
///
/// ```
/// use url_canon::char::is_pchar;
/// use url_canon::percent_encode::percent_encode;
///
/// let path_char = |c| is_pchar(c) || c == '/';
/// assert_eq!(percent_encode("/a b/c", path_char), "/a%20b/c");
/// assert_eq!(percent_encode("/a%20b/c", path_char), "/a%20b/c");
/// ```
#[must_use]
pub fn percent_encode(s: &str, predicate: CharPredicate) -> Cow<'_, str> {
    let encoded = PercentEncoded::new(s, predicate);
    if encoded.is_noop() {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(encoded.to_string())
    }
}

/// Percent-encodes the given character and writes it.
#[inline]
fn write_pct_encoded_char<W: fmt::Write>(writer: &mut W, c: char) -> fmt::Result {
    let mut buf = [0_u8; 4];
    let buf = c.encode_utf8(&mut buf);
    buf.bytes().try_for_each(|b| write!(writer, "%{:02X}", b))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::char::{is_uric, is_userinfo};

    #[test]
    fn encode_non_ascii() {
        assert_eq!(
            PercentEncoded::new("\u{03B1}\u{3042}", is_uric).to_string(),
            "%CE%B1%E3%81%82"
        );
    }

    #[test]
    fn keep_triplets() {
        assert_eq!(percent_encode("%2f%2F", is_uric), "%2f%2F");
        assert_eq!(percent_encode("%", is_uric), "%25");
        assert_eq!(percent_encode("%4", is_uric), "%254");
        assert_eq!(percent_encode("%%41", is_uric), "%25%41");
    }

    #[test]
    fn borrow_when_unchanged() {
        assert!(matches!(percent_encode("user;name", is_userinfo), Cow::Borrowed(_)));
        assert!(matches!(percent_encode("user@name", is_userinfo), Cow::Owned(_)));
        assert_eq!(percent_encode("user@name", is_userinfo), "user%40name");
    }

    #[test]
    fn encoding_is_idempotent() {
        for raw in ["a b", "%", "\u{03B1}%zz", "a%2", "#frag?"] {
            let once = percent_encode(raw, is_uric).into_owned();
            assert_eq!(percent_encode(&once, is_uric), once, "raw={raw:?}");
        }
    }

    #[test]
    fn decode_lossy() {
        assert_eq!(percent_decode("a%2Eb"), "a.b");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%C3"), "\u{FFFD}");
    }
}
