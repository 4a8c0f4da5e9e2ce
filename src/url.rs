//! URL value type.
//!
//! [`Url`] is an immutable set of components.
//! It is not parsed from a string; values are built from components with
//! [`Url::new`] and the `with_*` methods, each of which returns a new value.

use std::error;
use std::fmt;

use crate::domain::Domain;

/// URL component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Component {
    /// Scheme.
    Scheme,
    /// Username.
    Username,
    /// Password.
    Password,
    /// Host.
    Host,
    /// Port.
    Port,
    /// Path.
    Path,
    /// Query.
    Query,
}

impl Component {
    /// Returns the name of the component.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::Username => "username",
            Self::Password => "password",
            Self::Host => "host",
            Self::Port => "port",
            Self::Path => "path",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for Component {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error on setting a URL component.
///
/// Returned when the new value would make the URL unserializable or
/// ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentError {
    /// Rejected component.
    component: Component,
}

impl ComponentError {
    /// Creates a new `ComponentError`.
    ///
    /// For internal use.
    #[inline]
    #[must_use]
    pub(crate) fn new(component: Component) -> Self {
        Self { component }
    }

    /// Returns the rejected component.
    #[inline]
    #[must_use]
    pub fn component(&self) -> Component {
        self.component
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid URL {}", self.component)
    }
}

impl error::Error for ComponentError {}

/// URL.
///
/// # Examples
///
/// ```
/// use url_canon::domain::Domain;
/// use url_canon::url::Url;
///
/// let url = Url::new("http")?
///     .with_host(Some(Domain::parse("example.com")?))?
///     .with_port(Some(8080))?
///     .with_path("/a/b")?
///     .with_query(Some("x=1"))?
///     .with_fragment(Some("top"));
/// assert_eq!(url.to_string(), "http://example.com:8080/a/b?x=1#top");
/// assert_eq!(url.query(), Some("?x=1"));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Url {
    /// Scheme.
    scheme: String,
    /// Username, empty if absent.
    username: String,
    /// Password, empty if absent.
    password: String,
    /// Host.
    host: Option<Domain>,
    /// Port.
    port: Option<u16>,
    /// Path.
    path: String,
    /// Query with the leading `?`.
    query: Option<String>,
    /// Fragment with the leading `#`.
    fragment: Option<String>,
}

impl Url {
    /// Creates a URL with the given scheme and no other components.
    pub fn new(scheme: &str) -> Result<Self, ComponentError> {
        validate_scheme(scheme)?;
        Ok(Self {
            scheme: scheme.to_owned(),
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: String::new(),
            query: None,
            fragment: None,
        })
    }

    /// Returns the scheme.
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the username, or an empty string if absent.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password, or an empty string if absent.
    #[inline]
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> Option<&Domain> {
        self.host.as_ref()
    }

    /// Returns the port.
    #[inline]
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query including the leading `?`.
    #[inline]
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment including the leading `#`.
    #[inline]
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns a URL with the scheme replaced.
    pub fn with_scheme(&self, scheme: &str) -> Result<Self, ComponentError> {
        validate_scheme(scheme)?;
        Ok(Self {
            scheme: scheme.to_owned(),
            ..self.clone()
        })
    }

    /// Returns a URL with the username replaced.
    ///
    /// A non-empty username requires a host.
    pub fn with_username(&self, username: &str) -> Result<Self, ComponentError> {
        self.validate_userinfo(username, Component::Username)?;
        Ok(Self {
            username: username.to_owned(),
            ..self.clone()
        })
    }

    /// Returns a URL with the password replaced.
    ///
    /// A non-empty password requires a host.
    pub fn with_password(&self, password: &str) -> Result<Self, ComponentError> {
        self.validate_userinfo(password, Component::Password)?;
        Ok(Self {
            password: password.to_owned(),
            ..self.clone()
        })
    }

    /// Returns a URL with the host replaced.
    ///
    /// Removing the host fails if the URL has userinfo or a port, or if the
    /// path starts with `//`.
    /// Setting a host fails if the path is neither empty nor starts with `/`.
    pub fn with_host(&self, host: Option<Domain>) -> Result<Self, ComponentError> {
        let valid = match host {
            Some(_) => path_allowed_with_host(&self.path),
            None => {
                self.username.is_empty()
                    && self.password.is_empty()
                    && self.port.is_none()
                    && !self.path.starts_with("//")
            }
        };
        if !valid {
            return Err(ComponentError::new(Component::Host));
        }
        Ok(Self {
            host,
            ..self.clone()
        })
    }

    /// Returns a URL with the port replaced.
    ///
    /// A port requires a host.
    pub fn with_port(&self, port: Option<u16>) -> Result<Self, ComponentError> {
        if port.is_some() && self.host.is_none() {
            return Err(ComponentError::new(Component::Port));
        }
        Ok(Self {
            port,
            ..self.clone()
        })
    }

    /// Returns a URL with the path replaced.
    pub fn with_path(&self, path: &str) -> Result<Self, ComponentError> {
        let valid = !path.contains(['?', '#'])
            && match self.host {
                Some(_) => path_allowed_with_host(path),
                None => !path.starts_with("//"),
            };
        if !valid {
            return Err(ComponentError::new(Component::Path));
        }
        Ok(Self {
            path: path.to_owned(),
            ..self.clone()
        })
    }

    /// Returns a URL with the query replaced.
    ///
    /// `query` is the text after `?`; `None` removes the query.
    pub fn with_query(&self, query: Option<&str>) -> Result<Self, ComponentError> {
        if query.map_or(false, |q| q.contains('#')) {
            return Err(ComponentError::new(Component::Query));
        }
        Ok(Self {
            query: query.map(|q| format!("?{}", q)),
            ..self.clone()
        })
    }

    /// Returns a URL with the fragment replaced.
    ///
    /// `fragment` is the text after `#`; `None` removes the fragment.
    #[must_use]
    pub fn with_fragment(&self, fragment: Option<&str>) -> Self {
        Self {
            fragment: fragment.map(|f| format!("#{}", f)),
            ..self.clone()
        }
    }

    /// Checks a new username or password.
    fn validate_userinfo(&self, value: &str, component: Component) -> Result<(), ComponentError> {
        let valid = !value.contains(['@', '/', '?', '#'])
            && (value.is_empty() || self.host.is_some());
        if valid {
            Ok(())
        } else {
            Err(ComponentError::new(component))
        }
    }
}

/// Checks `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn validate_scheme(scheme: &str) -> Result<(), ComponentError> {
    let mut bytes = scheme.bytes();
    let valid = bytes.next().map_or(false, |b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    if valid {
        Ok(())
    } else {
        Err(ComponentError::new(Component::Scheme))
    }
}

/// Returns true if the path can follow an authority.
#[inline]
fn path_allowed_with_host(path: &str) -> bool {
    path.is_empty() || path.starts_with('/')
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(host) = &self.host {
            f.write_str("//")?;
            if !self.username.is_empty() || !self.password.is_empty() {
                f.write_str(&self.username)?;
                if !self.password.is_empty() {
                    write!(f, ":{}", self.password)?;
                }
                f.write_str("@")?;
            }
            write!(f, "{}", host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            f.write_str(query)?;
        }
        if let Some(fragment) = &self.fragment {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}
