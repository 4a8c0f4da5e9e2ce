//! Parse settings and error handlers.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ParseError;
use crate::idna::{IdnaEngine, HOST_ENGINE};

/// Receiver of fatal parse errors.
///
/// The domain processor calls [`fatal_error`][`Self::fatal_error`] before it
/// fails.
/// Returning `Ok(())` lets the processor fail with the reported error;
/// returning `Err(_)` makes the processor fail with the returned error
/// instead.
/// In either case the processing does not continue.
pub trait ErrorHandler: Send + Sync {
    /// Receives a fatal error.
    fn fatal_error(&self, error: &ParseError) -> Result<(), ParseError>;
}

/// Error handler which does nothing.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IgnoreErrors;

impl ErrorHandler for IgnoreErrors {
    #[inline]
    fn fatal_error(&self, _error: &ParseError) -> Result<(), ParseError> {
        Ok(())
    }
}

/// Error handler which emits the errors as `warn` level logs.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogErrors;

impl ErrorHandler for LogErrors {
    fn fatal_error(&self, error: &ParseError) -> Result<(), ParseError> {
        log::warn!("fatal domain parse error: {}", error);
        Ok(())
    }
}

/// Error handler which stores the errors.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use url_canon::domain::Domain;
/// use url_canon::settings::{CollectErrors, ParseSettings};
///
/// let collector = Arc::new(CollectErrors::new());
/// let settings = ParseSettings::new().with_error_handler(collector.clone());
///
/// assert!(Domain::parse_with(&settings, "exa mple.com", false).is_err());
/// assert!(Domain::parse_with(&settings, "", false).is_err());
///
/// // Empty input is rejected before any processing.
/// let errors = collector.take();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(
///     errors[0].to_string(),
///     "Illegal character in domain: space is not allowed"
/// );
/// ```
#[derive(Default, Debug)]
pub struct CollectErrors {
    /// Received errors.
    errors: Mutex<Vec<ParseError>>,
}

impl CollectErrors {
    /// Creates a new empty collector.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the received errors out of the collector.
    #[must_use]
    pub fn take(&self) -> Vec<ParseError> {
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *errors)
    }
}

impl ErrorHandler for CollectErrors {
    fn fatal_error(&self, error: &ParseError) -> Result<(), ParseError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.clone());
        Ok(())
    }
}

/// Settings of domain parsing.
///
/// Cloning is cheap.
#[derive(Clone, Default)]
pub struct ParseSettings {
    /// Error handler, or `None` for [`IgnoreErrors`].
    error_handler: Option<Arc<dyn ErrorHandler>>,
    /// IDNA engine, or `None` for [`Uts46`][`crate::idna::Uts46`] with
    /// [`IdnaProfile::HOST`][`crate::idna::IdnaProfile::HOST`].
    idna_engine: Option<Arc<dyn IdnaEngine>>,
}

impl ParseSettings {
    /// Creates the default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error handler.
    #[must_use]
    pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    /// Sets the IDNA engine.
    #[must_use]
    pub fn with_idna_engine(mut self, engine: Arc<dyn IdnaEngine>) -> Self {
        self.idna_engine = Some(engine);
        self
    }

    /// Returns the error handler.
    #[must_use]
    pub fn error_handler(&self) -> &dyn ErrorHandler {
        match &self.error_handler {
            Some(handler) => &**handler,
            None => &IgnoreErrors,
        }
    }

    /// Returns the IDNA engine.
    #[must_use]
    pub fn idna_engine(&self) -> &dyn IdnaEngine {
        match &self.idna_engine {
            Some(engine) => &**engine,
            None => &HOST_ENGINE,
        }
    }
}

impl fmt::Debug for ParseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseSettings")
            .field("custom_error_handler", &self.error_handler.is_some())
            .field("custom_idna_engine", &self.idna_engine.is_some())
            .finish()
    }
}
