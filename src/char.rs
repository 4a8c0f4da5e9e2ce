//! Character classes.
//!
//! The component classes follow the grammar of [RFC 2396] (the "legacy"
//! URI grammar), not [RFC 3986].
//! All of them are ASCII-only: any non-ASCII character is rejected.
//!
//! [RFC 2396]: https://tools.ietf.org/html/rfc2396#section-2
//! [RFC 3986]: https://tools.ietf.org/html/rfc3986

/// Checks if the given character matches `mark` rule.
///
/// ```text
/// mark = "-" | "_" | "." | "!" | "~" | "*" | "'" | "(" | ")"
/// ```
///
/// Note that `~` is not accepted here, so it is percent-encoded by the
/// canonicalizers.
#[inline]
#[must_use]
pub fn is_mark(c: char) -> bool {
    matches!(c, '-' | '_' | '.' | '!' | '*' | '\'' | '(' | ')')
}

/// Checks if the given character matches `unreserved` rule.
#[inline]
#[must_use]
pub fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_mark(c)
}

/// Checks if the given character matches `reserved` rule.
#[inline]
#[must_use]
pub fn is_reserved(c: char) -> bool {
    matches!(
        c,
        ';' | '/' | '?' | ':' | '@' | '&' | '=' | '+' | '$' | ','
    )
}

/// Checks if the given character matches `pchar` rule, except for `escaped`.
///
/// Percent-encoded triplets are handled by the encoder before this predicate
/// is consulted.
#[inline]
#[must_use]
pub fn is_pchar(c: char) -> bool {
    is_unreserved(c) || matches!(c, ':' | '@' | '&' | '=' | '+' | '$' | ',')
}

/// Checks if the given character matches `uric` rule, except for `escaped`.
#[inline]
#[must_use]
pub fn is_uric(c: char) -> bool {
    is_reserved(c) || is_unreserved(c)
}

/// Checks if the given character can appear raw in a user name or a password.
///
/// This differs from the `userinfo` rule in that `:` is accepted: user name and
/// password are processed separately, so a colon cannot be confused with the
/// user/password delimiter.
#[inline]
#[must_use]
pub fn is_userinfo(c: char) -> bool {
    is_unreserved(c) || matches!(c, ';' | ':' | '&' | '=' | '+' | '$' | ',')
}

/// Checks if the given character is a [forbidden host code point].
///
/// [forbidden host code point]: https://url.spec.whatwg.org/#forbidden-host-code-point
#[inline]
#[must_use]
pub fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t'
            | '\n'
            | '\r'
            | ' '
            | '#'
            | '%'
            | '/'
            | ':'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
    )
}

/// Checks if the given character separates domain labels.
///
/// These are U+002E FULL STOP, U+3002 IDEOGRAPHIC FULL STOP,
/// U+FF0E FULLWIDTH FULL STOP and U+FF61 HALFWIDTH IDEOGRAPHIC FULL STOP.
#[inline]
#[must_use]
pub fn is_label_separator(c: char) -> bool {
    matches!(c, '\u{002E}' | '\u{3002}' | '\u{FF0E}' | '\u{FF61}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_excludes_tilde() {
        assert!("-_.!*'()".chars().all(is_mark));
        assert!(!is_mark('~'));
        assert!(!is_unreserved('~'));
    }

    #[test]
    fn non_ascii_is_rejected() {
        for c in ['\u{03B1}', '\u{00E9}', '\u{3042}'] {
            assert!(!is_unreserved(c));
            assert!(!is_pchar(c));
            assert!(!is_uric(c));
            assert!(!is_userinfo(c));
        }
    }

    #[test]
    fn component_classes() {
        assert!(is_pchar(':') && is_pchar('@'));
        assert!(!is_pchar('/') && !is_pchar('?') && !is_pchar(';'));

        assert!(is_uric('/') && is_uric('?') && is_uric(';'));
        assert!(!is_uric('#') && !is_uric('%') && !is_uric(' '));

        assert!(is_userinfo(':') && is_userinfo(';'));
        assert!(!is_userinfo('@') && !is_userinfo('/') && !is_userinfo('?'));
    }

    #[test]
    fn forbidden_host_code_points() {
        let forbidden = "\0\t\n\r #%/:?@[\\]";
        assert_eq!(forbidden.chars().count(), 14);
        assert!(forbidden.chars().all(is_forbidden_host_code_point));
        assert!(!"abc-_.~*".chars().any(is_forbidden_host_code_point));
    }

    #[test]
    fn label_separators() {
        assert!(".\u{3002}\u{FF0E}\u{FF61}".chars().all(is_label_separator));
        assert!(!is_label_separator(','));
    }
}
