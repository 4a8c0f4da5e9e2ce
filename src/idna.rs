//! IDNA processing.
//!
//! The conversions are delegated to an [`IdnaEngine`].
//! The default engine, [`Uts46`], is built on the `idna` crate and reports
//! the violations as a set of [`IdnaError`] kinds, so that the caller can
//! decide for each kind whether it is fatal (see [`IdnaError::disposition`]).

use std::borrow::Cow;
use std::fmt;

use idna::uts46::{AsciiDenyList, DnsLength, Hyphens};
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::is_combining_mark;

use crate::char::{is_forbidden_host_code_point, is_label_separator};

/// U+200C ZERO WIDTH NON-JOINER.
const ZWNJ: char = '\u{200C}';
/// U+200D ZERO WIDTH JOINER.
const ZWJ: char = '\u{200D}';
/// Prefix of ACE labels.
const ACE_PREFIX: &str = "xn--";

/// Printable ASCII characters denied by the STD3 rules, except for the
/// forbidden host code points.
const STD3_DENY_LIST: AsciiDenyList = AsciiDenyList::new(false, "!\"$&'()*+,;<=>^_`{|}~");

/// The engine used unless the settings provide another one.
pub(crate) static HOST_ENGINE: Uts46 = Uts46::new(IdnaProfile::HOST);

/// Kind of an IDNA violation.
///
/// The variants are listed in the order the violations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum IdnaError {
    /// A non-final domain name label (or the whole domain name) is empty.
    EmptyLabel,
    /// A domain name label is longer than 63 bytes.
    LabelTooLong,
    /// A domain name is longer than 255 bytes in its storage form.
    DomainNameTooLong,
    /// A label starts with a hyphen-minus.
    LeadingHyphen,
    /// A label ends with a hyphen-minus.
    TrailingHyphen,
    /// A label contains hyphen-minus in the third and fourth positions.
    Hyphen3_4,
    /// A label starts with a combining mark.
    LeadingCombiningMark,
    /// A label or domain name contains disallowed characters.
    Disallowed,
    /// A label starts with `xn--` but does not contain valid Punycode.
    Punycode,
    /// A label contains a full stop.
    LabelHasDot,
    /// An ACE label does not contain a valid label string.
    InvalidAceLabel,
    /// A label does not meet the bidi rule.
    Bidi,
    /// A label does not meet the CONTEXTJ rules.
    ContextJ,
    /// A label does not meet the CONTEXTO rules for punctuation characters.
    ContextOPunctuation,
    /// A label does not meet the CONTEXTO rules for digits.
    ContextODigits,
}

impl IdnaError {
    /// All kinds, in the reporting order.
    pub const ALL: [IdnaError; 15] = [
        IdnaError::EmptyLabel,
        IdnaError::LabelTooLong,
        IdnaError::DomainNameTooLong,
        IdnaError::LeadingHyphen,
        IdnaError::TrailingHyphen,
        IdnaError::Hyphen3_4,
        IdnaError::LeadingCombiningMark,
        IdnaError::Disallowed,
        IdnaError::Punycode,
        IdnaError::LabelHasDot,
        IdnaError::InvalidAceLabel,
        IdnaError::Bidi,
        IdnaError::ContextJ,
        IdnaError::ContextOPunctuation,
        IdnaError::ContextODigits,
    ];

    /// Returns how the domain processor treats the violation.
    ///
    /// Hyphen placement is never enforced: host parsing is more permissive
    /// than IDNA registration.
    #[must_use]
    pub const fn disposition(self) -> Disposition {
        match self {
            IdnaError::Bidi
            | IdnaError::ContextJ
            | IdnaError::ContextODigits
            | IdnaError::ContextOPunctuation
            | IdnaError::Disallowed
            | IdnaError::DomainNameTooLong
            | IdnaError::InvalidAceLabel
            | IdnaError::LabelHasDot
            | IdnaError::LabelTooLong
            | IdnaError::LeadingCombiningMark
            | IdnaError::Punycode => Disposition::Fatal,
            IdnaError::EmptyLabel => Disposition::FatalIfStrict,
            IdnaError::Hyphen3_4 | IdnaError::LeadingHyphen | IdnaError::TrailingHyphen => {
                Disposition::Tolerated
            }
        }
    }

    /// Returns the human-readable description.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            IdnaError::EmptyLabel => {
                "A non-final domain name label (or the whole domain name) is empty."
            }
            IdnaError::LabelTooLong => "A domain name label is longer than 63 bytes.",
            IdnaError::DomainNameTooLong => {
                "A domain name is longer than 255 bytes in its storage form."
            }
            IdnaError::LeadingHyphen => "A label starts with a hyphen-minus ('-').",
            IdnaError::TrailingHyphen => "A label ends with a hyphen-minus ('-').",
            IdnaError::Hyphen3_4 => {
                "A label contains hyphen-minus ('-') in the third and fourth positions."
            }
            IdnaError::LeadingCombiningMark => "A label starts with a combining mark.",
            IdnaError::Disallowed => "A label or domain name contains disallowed characters.",
            IdnaError::Punycode => {
                "A label starts with \"xn--\" but does not contain valid Punycode."
            }
            IdnaError::LabelHasDot => "A label contains a dot=full stop.",
            IdnaError::InvalidAceLabel => "An ACE label does not contain a valid label string.",
            IdnaError::Bidi => {
                "A label does not meet the IDNA BiDi requirements (for right-to-left characters)."
            }
            IdnaError::ContextJ => "A label does not meet the IDNA CONTEXTJ requirements.",
            IdnaError::ContextOPunctuation => {
                "A label does not meet the IDNA CONTEXTO requirements for punctuation characters."
            }
            IdnaError::ContextODigits => {
                "A label does not meet the IDNA CONTEXTO requirements for digits."
            }
        }
    }

    /// Returns the bit in [`IdnaErrors`].
    #[inline]
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for IdnaError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How a violation is treated by the domain processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Always fatal.
    Fatal,
    /// Fatal only under strict validation.
    FatalIfStrict,
    /// Never fatal.
    Tolerated,
}

impl Disposition {
    /// Returns true if the violation aborts processing.
    #[inline]
    #[must_use]
    pub const fn is_fatal(self, strict: bool) -> bool {
        match self {
            Disposition::Fatal => true,
            Disposition::FatalIfStrict => strict,
            Disposition::Tolerated => false,
        }
    }
}

/// Set of IDNA violations.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdnaErrors {
    /// Bits of [`IdnaError::bit`].
    bits: u16,
}

impl IdnaErrors {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Returns true if no violation is recorded.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Returns true if the given violation is recorded.
    #[inline]
    #[must_use]
    pub const fn contains(self, error: IdnaError) -> bool {
        self.bits & error.bit() != 0
    }

    /// Records the violation.
    #[inline]
    pub fn insert(&mut self, error: IdnaError) {
        self.bits |= error.bit();
    }

    /// Returns the recorded violations in the reporting order.
    pub fn iter(self) -> impl Iterator<Item = IdnaError> {
        IdnaError::ALL
            .into_iter()
            .filter(move |&error| self.contains(error))
    }
}

impl fmt::Debug for IdnaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Extend<IdnaError> for IdnaErrors {
    fn extend<I: IntoIterator<Item = IdnaError>>(&mut self, iter: I) {
        iter.into_iter().for_each(|error| self.insert(error));
    }
}

impl FromIterator<IdnaError> for IdnaErrors {
    fn from_iter<I: IntoIterator<Item = IdnaError>>(iter: I) -> Self {
        let mut errors = Self::new();
        errors.extend(iter);
        errors
    }
}

/// Result of an IDNA conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdnaOutput {
    /// Converted domain.
    ///
    /// If `errors` contains fatal violations, this is the best-effort result.
    pub result: String,
    /// Violations found during the conversion.
    pub errors: IdnaErrors,
}

/// IDNA conversions used by the domain processor.
///
/// Implementations must be stateless from the caller's point of view, since a
/// single engine is shared by all threads.
pub trait IdnaEngine: Send + Sync {
    /// Converts the domain to its ASCII form ("ToASCII").
    ///
    /// `strict` enables the DNS length checks.
    fn name_to_ascii(&self, domain: &str, strict: bool) -> IdnaOutput;

    /// Converts the domain to its Unicode form ("ToUnicode").
    fn name_to_unicode(&self, domain: &str) -> IdnaOutput;
}

/// Processing flags of UTS #46.
///
/// Processing is always non-transitional, and the bidi and CONTEXTJ rules are
/// always checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdnaProfile {
    /// Disallow ASCII characters other than LDH.
    ///
    /// Forbidden host code points are not rejected here.
    use_std3_rules: bool,
    /// Report label and domain lengths exceeding DNS limits.
    verify_dns_length: bool,
}

impl IdnaProfile {
    /// The profile of [WHATWG URL host parsing][domain-to-ascii].
    ///
    /// STD3 rules are used, except that the forbidden host code points are
    /// left to the caller (see
    /// [`is_forbidden_host_code_point`][`crate::char::is_forbidden_host_code_point`]).
    /// DNS length verification is only enabled in strict mode
    /// (see [`to_strict`][`Self::to_strict`]).
    ///
    /// [domain-to-ascii]: https://url.spec.whatwg.org/#concept-domain-to-ascii
    pub const HOST: Self = Self {
        use_std3_rules: true,
        verify_dns_length: false,
    };

    /// Sets whether the STD3 ASCII rules are used.
    #[inline]
    #[must_use]
    pub const fn use_std3_rules(mut self, value: bool) -> Self {
        self.use_std3_rules = value;
        self
    }

    /// Sets whether DNS length limits are checked.
    #[inline]
    #[must_use]
    pub const fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    /// Returns the profile for strict validation.
    #[inline]
    #[must_use]
    pub const fn to_strict(self) -> Self {
        self.verify_dns_length(true)
    }

    /// Returns the ASCII characters the `idna` crate rejects.
    const fn deny_list(self) -> AsciiDenyList {
        if self.use_std3_rules {
            STD3_DENY_LIST
        } else {
            AsciiDenyList::EMPTY
        }
    }

    /// Runs ToUnicode of the `idna` crate.
    ///
    /// Hyphens and lengths are checked by [`Uts46`] itself.
    fn to_unicode(self, domain: &str) -> (Cow<'_, str>, bool) {
        let (unicode, status) = idna::uts46::Uts46::new().to_unicode(
            domain.as_bytes(),
            self.deny_list(),
            Hyphens::Allow,
        );
        (unicode, status.is_ok())
    }

    /// Runs ToASCII of the `idna` crate.
    fn to_ascii(self, domain: &str) -> Option<Cow<'_, str>> {
        idna::uts46::Uts46::new()
            .to_ascii(
                domain.as_bytes(),
                self.deny_list(),
                Hyphens::Allow,
                DnsLength::Ignore,
            )
            .ok()
    }

    /// Returns true if the `idna` crate rejects the domain.
    fn rejects(self, domain: &str) -> bool {
        !self.to_unicode(domain).1
    }

    /// Returns true if the character is an ASCII control the STD3 rules deny.
    ///
    /// The deny list of the `idna` crate cannot express controls apart from
    /// other glyphless characters.
    fn denies_control(self, c: char) -> bool {
        self.use_std3_rules && c.is_ascii_control() && !is_forbidden_host_code_point(c)
    }
}

impl Default for IdnaProfile {
    #[inline]
    fn default() -> Self {
        Self::HOST
    }
}

/// UTS #46 engine backed by the `idna` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uts46 {
    /// Processing flags.
    profile: IdnaProfile,
}

impl Uts46 {
    /// Creates a new engine.
    #[inline]
    #[must_use]
    pub const fn new(profile: IdnaProfile) -> Self {
        Self { profile }
    }

    /// Returns the processing flags.
    #[inline]
    #[must_use]
    pub const fn profile(&self) -> IdnaProfile {
        self.profile
    }
}

impl Default for Uts46 {
    #[inline]
    fn default() -> Self {
        Self::new(IdnaProfile::HOST)
    }
}

impl IdnaEngine for Uts46 {
    fn name_to_ascii(&self, domain: &str, strict: bool) -> IdnaOutput {
        let profile = if strict {
            self.profile.to_strict()
        } else {
            self.profile
        };
        let (unicode, mut errors) = process(profile, domain);
        let result = match profile.to_ascii(domain) {
            Some(ascii) => ascii.into_owned(),
            None => {
                if errors.is_empty() {
                    errors.insert(IdnaError::Disallowed);
                }
                to_ascii_lossy(&unicode)
            }
        };
        if profile.verify_dns_length {
            check_dns_length(&result, &mut errors);
        }
        IdnaOutput { result, errors }
    }

    fn name_to_unicode(&self, domain: &str) -> IdnaOutput {
        let (result, errors) = process(self.profile, domain);
        IdnaOutput { result, errors }
    }
}

/// Maps and validates the domain, and returns the Unicode form.
fn process(profile: IdnaProfile, domain: &str) -> (String, IdnaErrors) {
    let (unicode, valid) = profile.to_unicode(domain);
    let mut errors = IdnaErrors::new();
    let labels: Vec<&str> = unicode.split('.').collect();

    // The last label can be empty (i.e. the root).
    if unicode.is_empty() || labels[..(labels.len() - 1)].iter().any(|l| l.is_empty()) {
        errors.insert(IdnaError::EmptyLabel);
    }
    for label in &labels {
        check_hyphens(label, &mut errors);
    }
    if unicode.chars().any(|c| profile.denies_control(c)) {
        errors.insert(IdnaError::Disallowed);
    }
    errors.extend(
        domain
            .split(is_label_separator)
            .filter(|label| has_ace_prefix(label))
            .filter_map(ace_violation),
    );
    if !valid {
        classify_failure(profile, domain, &mut errors);
    }

    (unicode.into_owned(), errors)
}

/// Records hyphen placement violations.
fn check_hyphens(label: &str, errors: &mut IdnaErrors) {
    if label.starts_with('-') {
        errors.insert(IdnaError::LeadingHyphen);
    }
    if label.ends_with('-') {
        errors.insert(IdnaError::TrailingHyphen);
    }
    if label.get(2..4) == Some("--") {
        errors.insert(IdnaError::Hyphen3_4);
    }
}

/// Records DNS length violations of the ASCII form.
fn check_dns_length(ascii: &str, errors: &mut IdnaErrors) {
    let name = ascii.strip_suffix('.').unwrap_or(ascii);
    if name.len() > 253 {
        errors.insert(IdnaError::DomainNameTooLong);
    }
    if name.split('.').any(|label| label.len() > 63) {
        errors.insert(IdnaError::LabelTooLong);
    }
}

/// Returns the violation of the Punycode part of an ACE label.
///
/// A label decoding to ASCII only is not a valid ACE label, since Punycode
/// encoding is only applied to labels with non-ASCII characters.
fn ace_violation(label: &str) -> Option<IdnaError> {
    let encoded = label.get(ACE_PREFIX.len()..)?.to_ascii_lowercase();
    match idna::punycode::decode_to_string(&encoded) {
        None => Some(IdnaError::Punycode),
        Some(decoded) if decoded.is_ascii() => Some(IdnaError::InvalidAceLabel),
        Some(_) => None,
    }
}

/// Finds out why the `idna` crate rejected the domain.
///
/// The crate only tells that the domain is invalid, so each label (and, if
/// necessary, each character) is processed again alone.
fn classify_failure(profile: IdnaProfile, domain: &str, errors: &mut IdnaErrors) {
    let mut found =
        errors.contains(IdnaError::Punycode) || errors.contains(IdnaError::InvalidAceLabel);
    for label in domain.split(is_label_separator) {
        if !profile.rejects(label) {
            continue;
        }
        let kind = if has_ace_prefix(label) {
            // Decodable, but the decoded label is invalid.
            ace_violation(label).unwrap_or(IdnaError::InvalidAceLabel)
        } else {
            classify_label(profile, label)
        };
        errors.insert(kind);
        found = true;
    }
    if !found {
        // Every label is valid alone, so the rules spanning labels are violated.
        errors.insert(if domain.split(is_label_separator).any(is_rtl) {
            IdnaError::Bidi
        } else {
            IdnaError::Disallowed
        });
    }
}

/// Returns the violation of the label which is invalid alone.
fn classify_label(profile: IdnaProfile, label: &str) -> IdnaError {
    if label.chars().next().map_or(false, is_combining_mark) {
        IdnaError::LeadingCombiningMark
    } else if label.contains(is_joiner) && !profile.rejects(&label.replace(is_joiner, "")) {
        // Valid without the joiners, so they are in a wrong context.
        IdnaError::ContextJ
    } else if label.chars().any(|c| is_disallowed(profile, c)) {
        IdnaError::Disallowed
    } else if is_rtl(label) {
        IdnaError::Bidi
    } else {
        IdnaError::Disallowed
    }
}

/// Returns true if the character is ZWNJ or ZWJ.
fn is_joiner(c: char) -> bool {
    c == ZWNJ || c == ZWJ
}

/// Returns true if the character is invalid in any label.
fn is_disallowed(profile: IdnaProfile, c: char) -> bool {
    if is_joiner(c) || is_combining_mark(c) {
        // These depend on the context.
        return false;
    }
    let mut sample = String::with_capacity(8);
    if bidi_class(c) == BidiClass::AN {
        // Arabic digits cannot start a label.
        sample.push('\u{0627}');
    }
    sample.push(c);
    profile.denies_control(c) || profile.rejects(&sample)
}

/// Returns true if the label contains right-to-left characters.
fn is_rtl(label: &str) -> bool {
    label
        .chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// Returns true if the label starts with `xn--`, ignoring ASCII case.
fn has_ace_prefix(label: &str) -> bool {
    label
        .get(..ACE_PREFIX.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(ACE_PREFIX))
}

/// Encodes the non-ASCII labels without validation.
fn to_ascii_lossy(unicode: &str) -> String {
    unicode
        .split('.')
        .map(|label| {
            if label.is_ascii() {
                return Cow::Borrowed(label);
            }
            match idna::punycode::encode_str(label) {
                Some(encoded) => Cow::Owned(format!("{}{}", ACE_PREFIX, encoded)),
                None => Cow::Borrowed(label),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
