//! Domain processing of the [WHATWG URL Standard][whatwg-url] and
//! [RFC 2396] canonicalization of URL components.
//!
//! [whatwg-url]: https://url.spec.whatwg.org/
//! [RFC 2396]: https://tools.ietf.org/html/rfc2396
//!
//! # Domains
//!
//! [`Domain`] is a host name processed by the host parser of the URL
//! Standard: percent-decoding, IDNA ToASCII ([UTS #46]), a check of
//! forbidden host code points, and optionally IDNA ToUnicode.
//!
//! ```
//! use url_canon::Domain;
//!
//! let domain = Domain::parse("B%C3%BCcher.example")?;
//! assert_eq!(domain, "xn--bcher-kva.example");
//! assert_eq!(domain.to_human_string(), "b\u{00FC}cher.example");
//! assert_eq!(domain.labels().collect::<Vec<_>>(), ["xn--bcher-kva", "example"]);
//! # Ok::<_, url_canon::ParseError>(())
//! ```
//!
//! Violations of IDNA rules are either fatal or tolerated: hyphen placement
//! is always tolerated, and empty labels are only fatal in strict mode.
//! Fatal errors are reported to the [`ErrorHandler`][`settings::ErrorHandler`]
//! of the [`ParseSettings`][`settings::ParseSettings`] before parsing fails.
//!
//! [UTS #46]: https://www.unicode.org/reports/tr46/
//!
//! # Canonicalization
//!
//! [`Canonicalizer`][`canonicalize::Canonicalizer`] rewrites a
//! [`Url`][`url::Url`] into a canonical form.
//! [`Rfc2396Canonicalizer`][`canonicalize::Rfc2396Canonicalizer`]
//! percent-encodes the characters RFC 2396 does not allow in the username,
//! password, path, query, and fragment.
//!
//! # Logging
//!
//! This crate emits logs through the [`log`] facade and never installs a
//! logger.
//!
//! # Features
//!
//! * `serde`
//!     + Implements `Serialize` and `Deserialize` for [`Domain`].
//! * `memchr`
//!     + Uses the `memchr` crate to find percent signs while encoding.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod canonicalize;
pub mod char;
pub mod domain;
pub mod error;
pub mod idna;
pub mod percent_encode;
mod scan;
pub mod settings;
pub mod url;

pub use self::domain::Domain;
pub use self::error::ParseError;
