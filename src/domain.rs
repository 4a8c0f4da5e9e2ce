//! Domains.
//!
//! A [`Domain`] is built by the [host parser] of the WHATWG URL Standard,
//! restricted to domains (IP addresses are not handled here):
//!
//! 1. percent-decode the input,
//! 2. convert it with IDNA ToASCII,
//! 3. reject forbidden host code points,
//! 4. optionally convert the result with IDNA ToUnicode.
//!
//! [host parser]: https://url.spec.whatwg.org/#concept-host-parser

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::str::{FromStr, Split};

use crate::char::{is_forbidden_host_code_point, is_label_separator};
use crate::error::{ErrorKind, ParseError};
use crate::idna::{IdnaEngine, IdnaErrors, HOST_ENGINE};
use crate::percent_encode::percent_decode;
use crate::settings::{ErrorHandler, ParseSettings};

/// A validated and canonicalized domain.
///
/// The domain is stored either in its ASCII form (with punycode-encoded
/// labels) or in its Unicode form.
///
/// # Identity
///
/// Comparison and hashing only look at the stored string, not at which form
/// it is: two domains storing the same string are equal even if one of them
/// was requested as the Unicode form.
/// Host matching relies on this.
///
/// ```
/// use url_canon::domain::Domain;
///
/// let ascii = Domain::parse("example.com")?;
/// let unicode = Domain::parse_unicode("example.com")?;
/// assert!(!ascii.is_unicode());
/// assert!(unicode.is_unicode());
/// assert_eq!(ascii, unicode);
/// # Ok::<_, url_canon::error::ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Domain {
    /// Canonical string.
    text: String,
    /// Whether `text` is the Unicode form.
    unicode: bool,
}

impl Domain {
    /// Parses the domain with the default settings and returns its ASCII form.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_canon::domain::Domain;
    ///
    /// assert_eq!(Domain::parse("EXAMPLE.com")?, "example.com");
    /// assert_eq!(Domain::parse("b%C3%BCcher.de")?, "xn--bcher-kva.de");
    /// assert!(Domain::parse("exa mple.com").is_err());
    /// # Ok::<_, url_canon::error::ParseError>(())
    /// ```
    #[inline]
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(&ParseSettings::default(), input, false)
    }

    /// Parses the domain with the default settings and returns its Unicode
    /// form.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_canon::domain::Domain;
    ///
    /// assert_eq!(Domain::parse_unicode("xn--bcher-kva.de")?, "b\u{00FC}cher.de");
    /// # Ok::<_, url_canon::error::ParseError>(())
    /// ```
    #[inline]
    pub fn parse_unicode(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(&ParseSettings::default(), input, true)
    }

    /// Parses the domain.
    ///
    /// If `unicode` is true, the returned domain holds the Unicode form,
    /// otherwise the ASCII form.
    ///
    /// Fatal errors are reported to the error handler of the settings
    /// before this function fails.
    /// Empty input is rejected without reporting.
    pub fn parse_with(
        settings: &ParseSettings,
        input: &str,
        unicode: bool,
    ) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ErrorKind::EmptyInput.into());
        }

        let engine = settings.idna_engine();
        let handler = settings.error_handler();

        let decoded = percent_decode(input);
        let ascii = domain_to_ascii(engine, handler, &decoded, false)?;
        log::trace!("domain {:?} has ASCII form {:?}", input, ascii);

        if let Some(c) = ascii.chars().find(|&c| is_forbidden_host_code_point(c)) {
            return fail(handler, ErrorKind::IllegalCharacter(c));
        }

        if !unicode {
            return Ok(Self {
                text: ascii,
                unicode: false,
            });
        }
        let text = domain_to_unicode(engine, handler, &ascii)?;
        Ok(Self {
            text,
            unicode: true,
        })
    }

    /// Returns the stored string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if the stored string is the Unicode form.
    #[inline]
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        self.unicode
    }

    /// Returns the labels.
    ///
    /// Any of U+002E, U+3002, U+FF0E and U+FF61 separates labels.
    /// Empty labels between adjacent separators are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_canon::domain::Domain;
    ///
    /// let domain = Domain::parse("a..b")?;
    /// assert_eq!(domain.labels().collect::<Vec<_>>(), ["a", "", "b"]);
    /// # Ok::<_, url_canon::error::ParseError>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn labels(&self) -> Labels<'_> {
        Labels::new(&self.text)
    }

    /// Returns the Unicode form for display.
    ///
    /// For a domain stored in the ASCII form, this converts it again and
    /// ignores IDNA violations.
    ///
    /// # Examples
    ///
    /// ```
    /// use url_canon::domain::Domain;
    ///
    /// let domain = Domain::parse("xn--bcher-kva.de")?;
    /// assert_eq!(domain.as_str(), "xn--bcher-kva.de");
    /// assert_eq!(domain.to_human_string(), "b\u{00FC}cher.de");
    /// # Ok::<_, url_canon::error::ParseError>(())
    /// ```
    #[must_use]
    pub fn to_human_string(&self) -> Cow<'_, str> {
        if self.unicode {
            return Cow::Borrowed(&self.text);
        }
        Cow::Owned(HOST_ENGINE.name_to_unicode(&self.text).result)
    }

    /// Returns the stored string.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Runs ToASCII and checks the violations.
///
/// Only `strict` mode makes empty labels fatal.
fn domain_to_ascii(
    engine: &dyn IdnaEngine,
    handler: &dyn ErrorHandler,
    domain: &str,
    strict: bool,
) -> Result<String, ParseError> {
    let output = engine.name_to_ascii(domain, strict);
    check_idna_errors(handler, output.errors, strict)?;
    Ok(output.result)
}

/// Runs ToUnicode and checks the violations.
fn domain_to_unicode(
    engine: &dyn IdnaEngine,
    handler: &dyn ErrorHandler,
    ascii: &str,
) -> Result<String, ParseError> {
    let output = engine.name_to_unicode(ascii);
    check_idna_errors(handler, output.errors, false)?;
    Ok(output.result)
}

/// Fails with the first fatal violation.
fn check_idna_errors(
    handler: &dyn ErrorHandler,
    errors: IdnaErrors,
    strict: bool,
) -> Result<(), ParseError> {
    for error in errors.iter() {
        if error.disposition().is_fatal(strict) {
            return fail(handler, ErrorKind::Idna(error));
        }
        log::debug!("tolerating IDNA violation {:?}", error);
    }
    Ok(())
}

/// Reports the error to the handler and fails.
fn fail<T>(handler: &dyn ErrorHandler, kind: ErrorKind) -> Result<T, ParseError> {
    let error = ParseError::new(kind);
    handler.fatal_error(&error)?;
    Err(error)
}

impl PartialEq for Domain {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialEq<str> for Domain {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Domain {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl fmt::Display for Domain {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Domain {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for Domain {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Domain {
    type Error = ParseError;

    #[inline]
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Domain {
    type Error = ParseError;

    #[inline]
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Domain> for String {
    #[inline]
    fn from(domain: Domain) -> Self {
        domain.text
    }
}

/// Iterator over the labels of a domain.
///
/// Returned by [`Domain::labels`].
#[derive(Debug, Clone)]
pub struct Labels<'a> {
    /// Label splitter, or `None` for the empty domain.
    inner: Option<Split<'a, fn(char) -> bool>>,
}

impl<'a> Labels<'a> {
    /// Creates a new iterator.
    fn new(text: &'a str) -> Self {
        let inner = if text.is_empty() {
            None
        } else {
            Some(text.split(is_label_separator as fn(char) -> bool))
        };
        Self { inner }
    }
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }
}

impl DoubleEndedIterator for Labels<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next_back()
    }
}

impl FusedIterator for Labels<'_> {}

#[cfg(feature = "serde")]
mod __serde {
    use super::Domain;

    use std::fmt;

    use serde::{
        de::{self, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use crate::settings::ParseSettings;

    impl Serialize for Domain {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(self.as_str())
        }
    }

    /// Domain string visitor.
    #[derive(Debug, Clone, Copy)]
    struct DomainVisitor;

    impl<'de> Visitor<'de> for DomainVisitor {
        type Value = Domain;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a domain string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // Keep the form of the serialized string.
            Domain::parse_with(&ParseSettings::default(), v, !v.is_ascii()).map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Domain {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(DomainVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::hash_map::DefaultHasher;
    use std::sync::Arc;

    use crate::idna::{IdnaError, IdnaOutput};
    use crate::settings::CollectErrors;

    /// Engine which reports the same violations for any input.
    struct FixedEngine(IdnaErrors);

    impl IdnaEngine for FixedEngine {
        fn name_to_ascii(&self, domain: &str, _strict: bool) -> IdnaOutput {
            IdnaOutput {
                result: domain.to_ascii_lowercase(),
                errors: self.0,
            }
        }

        fn name_to_unicode(&self, domain: &str) -> IdnaOutput {
            IdnaOutput {
                result: domain.to_owned(),
                errors: self.0,
            }
        }
    }

    fn settings_reporting(errors: &[IdnaError]) -> ParseSettings {
        let errors = errors.iter().copied().collect();
        ParseSettings::new().with_idna_engine(Arc::new(FixedEngine(errors)))
    }

    fn hash_of(domain: &Domain) -> u64 {
        let mut hasher = DefaultHasher::new();
        domain.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn identity_ignores_display_form() {
        let ascii = Domain {
            text: "example.com".to_owned(),
            unicode: false,
        };
        let unicode = Domain {
            text: "example.com".to_owned(),
            unicode: true,
        };
        assert_eq!(ascii, unicode);
        assert_eq!(hash_of(&ascii), hash_of(&unicode));
    }

    #[test]
    fn tolerated_violations_never_fail() {
        let settings = settings_reporting(&[
            IdnaError::EmptyLabel,
            IdnaError::LeadingHyphen,
            IdnaError::TrailingHyphen,
            IdnaError::Hyphen3_4,
        ]);
        let domain = Domain::parse_with(&settings, "-ab--c-..com", true)
            .expect("tolerated violations should not be fatal");
        assert_eq!(domain, "-ab--c-..com");
        assert!(domain.is_unicode());
    }

    #[test]
    fn fatal_violations_fail() {
        for kind in IdnaError::ALL {
            let settings = settings_reporting(&[kind]);
            let result = Domain::parse_with(&settings, "example.com", false);
            if kind.disposition().is_fatal(false) {
                assert_eq!(result.unwrap_err().kind(), ErrorKind::Idna(kind));
            } else {
                assert!(result.is_ok(), "kind={:?}", kind);
            }
        }
    }

    #[test]
    fn first_fatal_violation_is_reported() {
        let settings = settings_reporting(&[
            IdnaError::LeadingHyphen,
            IdnaError::Bidi,
            IdnaError::Disallowed,
        ]);
        let err = Domain::parse_with(&settings, "example.com", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Idna(IdnaError::Disallowed));
    }

    #[test]
    fn empty_label_fatal_only_when_strict() {
        let errors: IdnaErrors = [IdnaError::EmptyLabel].into_iter().collect();
        assert!(check_idna_errors(&crate::settings::IgnoreErrors, errors, false).is_ok());
        assert_eq!(
            check_idna_errors(&crate::settings::IgnoreErrors, errors, true)
                .unwrap_err()
                .kind(),
            ErrorKind::Idna(IdnaError::EmptyLabel)
        );
    }

    #[test]
    fn handler_is_notified_before_failure() {
        let collector = Arc::new(CollectErrors::new());
        let settings = settings_reporting(&[IdnaError::Punycode, IdnaError::LeadingHyphen])
            .with_error_handler(collector.clone());
        let err = Domain::parse_with(&settings, "xn--a.com", false).unwrap_err();
        assert_eq!(collector.take(), vec![err]);
    }

    #[test]
    fn handler_can_replace_the_error() {
        struct Escalate;
        impl ErrorHandler for Escalate {
            fn fatal_error(&self, _error: &ParseError) -> Result<(), ParseError> {
                Err(ErrorKind::Idna(IdnaError::LabelHasDot).into())
            }
        }

        let settings = ParseSettings::new().with_error_handler(Arc::new(Escalate));
        let err = Domain::parse_with(&settings, "a b", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Idna(IdnaError::LabelHasDot));
    }

    #[test]
    fn tolerated_violations_are_not_reported() {
        let collector = Arc::new(CollectErrors::new());
        let settings =
            settings_reporting(&[IdnaError::Hyphen3_4]).with_error_handler(collector.clone());
        assert!(Domain::parse_with(&settings, "ab--cd", false).is_ok());
        assert!(collector.take().is_empty());
    }

    #[test]
    fn empty_domain_has_no_labels() {
        let domain = Domain {
            text: String::new(),
            unicode: false,
        };
        assert_eq!(domain.labels().count(), 0);
    }

    #[test]
    fn labels_from_both_ends() {
        let domain = Domain {
            text: "a\u{3002}b\u{FF0E}c\u{FF61}d".to_owned(),
            unicode: true,
        };
        assert_eq!(domain.labels().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
        assert_eq!(
            domain.labels().rev().collect::<Vec<_>>(),
            ["d", "c", "b", "a"]
        );
    }

    #[test]
    fn human_string() {
        let domain = Domain::parse_unicode("b\u{00FC}cher.de").expect("valid domain");
        assert_eq!(domain.as_str(), "b\u{00FC}cher.de");
        assert!(matches!(domain.to_human_string(), Cow::Borrowed(_)));
    }
}
