//! Functions for string scanning.

/// Returns the start and end positions of the first `%XX` triplet in the given string.
///
/// Lone percent signs (not followed by two hexadecimal digits) are skipped.
#[must_use]
pub(crate) fn find_pct_triplet(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let mut offset = 0;
    while let Some(pos) = find_byte(&bytes[offset..], b'%') {
        let start = offset + pos;
        if is_xdigits2(&bytes[(start + 1)..]) {
            return Some((start, start + 3));
        }
        offset = start + 1;
    }
    None
}

/// Returns true if the given bytes start with two hexadecimal digits.
#[inline]
#[must_use]
fn is_xdigits2(bytes: &[u8]) -> bool {
    matches!(bytes, [upper, lower, ..] if upper.is_ascii_hexdigit() && lower.is_ascii_hexdigit())
}

/// Returns the position of the given byte.
#[cfg(feature = "memchr")]
#[inline]
#[must_use]
fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    memchr::memchr(needle, haystack)
}

/// Returns the position of the given byte.
#[cfg(not(feature = "memchr"))]
#[inline]
#[must_use]
fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplets() {
        assert_eq!(find_pct_triplet(""), None);
        assert_eq!(find_pct_triplet("abc"), None);
        assert_eq!(find_pct_triplet("%2F"), Some((0, 3)));
        assert_eq!(find_pct_triplet("a%2fb"), Some((1, 4)));
        assert_eq!(find_pct_triplet("100%"), None);
        assert_eq!(find_pct_triplet("%%41"), Some((1, 4)));
        assert_eq!(find_pct_triplet("%G1%e3%81"), Some((3, 6)));
    }
}
