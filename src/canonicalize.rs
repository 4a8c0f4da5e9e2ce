//! URL canonicalizers.
//!
//! A canonicalizer rewrites a [`Url`] into an equivalent URL in a canonical
//! form.
//! Canonicalizers are idempotent, and never touch the scheme, the host, and
//! the port.

use std::sync::Arc;

use crate::char::{is_pchar, is_uric, is_userinfo};
use crate::percent_encode::percent_encode;
use crate::url::{ComponentError, Url};

/// URL canonicalization policy.
pub trait Canonicalizer {
    /// Returns the canonicalized URL.
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError>;
}

impl<C: Canonicalizer + ?Sized> Canonicalizer for &C {
    #[inline]
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError> {
        (**self).canonicalize(url)
    }
}

impl<C: Canonicalizer + ?Sized> Canonicalizer for Box<C> {
    #[inline]
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError> {
        (**self).canonicalize(url)
    }
}

impl<C: Canonicalizer + ?Sized> Canonicalizer for Arc<C> {
    #[inline]
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError> {
        (**self).canonicalize(url)
    }
}

/// Returns true if the character is kept in paths.
fn is_path_char(c: char) -> bool {
    is_pchar(c) || c == '/'
}

/// Canonicalizer percent-encoding characters not allowed by [RFC 2396].
///
/// * The username and the password keep unreserved characters and
///   `;:&=+$,`.
///   (`:` is kept since the components are handled separately.)
/// * The path keeps `pchar` and `/`.
/// * The query and the fragment keep `uric`.
///
/// Valid `%XX` triplets are always kept as is.
///
/// # Examples
///
/// ```
/// use url_canon::canonicalize::{Canonicalizer, Rfc2396Canonicalizer};
/// use url_canon::domain::Domain;
/// use url_canon::url::Url;
///
/// let url = Url::new("http")?
///     .with_host(Some(Domain::parse("example.com")?))?
///     .with_path("/a b/\u{03B1}")?
///     .with_query(Some("q={x}"))?;
/// let canonical = Rfc2396Canonicalizer.canonicalize(&url)?;
/// assert_eq!(
///     canonical.to_string(),
///     "http://example.com/a%20b/%CE%B1?q=%7Bx%7D"
/// );
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
///
/// [RFC 2396]: https://tools.ietf.org/html/rfc2396
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rfc2396Canonicalizer;

impl Canonicalizer for Rfc2396Canonicalizer {
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError> {
        let mut url = url.clone();

        if !url.username().is_empty() {
            let username = percent_encode(url.username(), is_userinfo).into_owned();
            url = url.with_username(&username)?;
        }
        if !url.password().is_empty() {
            let password = percent_encode(url.password(), is_userinfo).into_owned();
            url = url.with_password(&password)?;
        }
        let path = percent_encode(url.path(), is_path_char).into_owned();
        url = url.with_path(&path)?;

        if let Some(body) = url.query().and_then(marker_body) {
            let query = percent_encode(body, is_uric).into_owned();
            url = url.with_query(Some(&query))?;
        }
        if let Some(body) = url.fragment().and_then(marker_body) {
            let fragment = percent_encode(body, is_uric).into_owned();
            url = url.with_fragment(Some(&fragment));
        }

        log::trace!("canonicalized URL: {}", url);
        Ok(url)
    }
}

/// Returns the component body after the marker, if it is not empty.
fn marker_body(component: &str) -> Option<&str> {
    component.get(1..).filter(|body| !body.is_empty())
}

/// Canonicalizer applying canonicalizers in order.
///
/// The empty combination returns the URL as is.
///
/// # Examples
///
/// ```
/// use url_canon::canonicalize::{Canonicalizer, CombinedCanonicalizer, Rfc2396Canonicalizer};
/// use url_canon::url::Url;
///
/// let combined = CombinedCanonicalizer::new()
///     .with(Rfc2396Canonicalizer)
///     .with(Rfc2396Canonicalizer);
/// assert_eq!(combined.len(), 2);
///
/// let url = Url::new("urn")?.with_path("a b")?;
/// assert_eq!(combined.canonicalize(&url)?.path(), "a%20b");
/// # Ok::<_, url_canon::url::ComponentError>(())
/// ```
#[derive(Default)]
pub struct CombinedCanonicalizer {
    /// Canonicalizers to apply.
    canonicalizers: Vec<Box<dyn Canonicalizer + Send + Sync>>,
}

impl CombinedCanonicalizer {
    /// Creates an empty combination.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a canonicalizer.
    #[must_use]
    pub fn with<C>(mut self, canonicalizer: C) -> Self
    where
        C: Canonicalizer + Send + Sync + 'static,
    {
        self.canonicalizers.push(Box::new(canonicalizer));
        self
    }

    /// Returns the number of the combined canonicalizers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.canonicalizers.len()
    }

    /// Returns true if nothing is combined.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonicalizers.is_empty()
    }
}

impl Canonicalizer for CombinedCanonicalizer {
    fn canonicalize(&self, url: &Url) -> Result<Url, ComponentError> {
        self.canonicalizers
            .iter()
            .try_fold(url.clone(), |url, c| c.canonicalize(&url))
    }
}

impl std::fmt::Debug for CombinedCanonicalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedCanonicalizer")
            .field("len", &self.len())
            .finish()
    }
}
