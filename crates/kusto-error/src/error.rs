//! Kusto error types.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Result type for Kusto operations.
pub type Result<T> = std::result::Result<T, KustoError>;

/// The closed set of error categories.
///
/// Every behaviour that differs between kinds (message prefix, display
/// label, sanitization) is a function of this tag. Foreign errors that do not
/// carry a kind are treated as [`ErrorKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Failure to reach or talk to the cluster.
    Connection,
    /// Credential resolution or token acquisition failed.
    Authentication,
    /// The service rejected or failed a query.
    Query,
    /// A database, table or other resource does not exist.
    ResourceNotFound,
    /// Caller input failed validation.
    Validation,
    /// A value could not be converted between representations.
    DataConversion,
    /// An operation exceeded its deadline.
    Timeout,
    /// Anything else.
    Generic,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 8] = [
        Self::Connection,
        Self::Authentication,
        Self::Query,
        Self::ResourceNotFound,
        Self::Validation,
        Self::DataConversion,
        Self::Timeout,
        Self::Generic,
    ];

    /// Prefix applied to the message when an error of this kind is built.
    ///
    /// Query and Generic errors keep their message unmodified.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Connection => "Connection error: ",
            Self::Authentication => "Authentication error: ",
            Self::ResourceNotFound => "Resource not found: ",
            Self::Validation => "Validation error: ",
            Self::DataConversion => "Data conversion error: ",
            Self::Timeout => "Timeout error: ",
            Self::Query | Self::Generic => "",
        }
    }

    /// Human-readable label used by [`KustoError::format`].
    ///
    /// Operator-facing only; never compare against it.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Connection => "Kusto Connection Error",
            Self::Authentication => "Kusto Authentication Error",
            Self::Query => "Kusto Query Error",
            Self::ResourceNotFound => "Kusto Resource Not Found",
            Self::Validation => "Kusto Validation Error",
            Self::DataConversion => "Kusto Data Conversion Error",
            Self::Timeout => "Kusto Timeout Error",
            Self::Generic => "Kusto Error",
        }
    }

    /// Classify an arbitrary error.
    ///
    /// Returns the error's own kind when it is a [`KustoError`], and
    /// [`ErrorKind::Generic`] for everything else.
    #[must_use]
    pub fn of(error: &(dyn StdError + 'static)) -> Self {
        error
            .downcast_ref::<KustoError>()
            .map_or(Self::Generic, KustoError::kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An error tagged with an [`ErrorKind`].
///
/// The kind's prefix is baked into the message when the error is created, so
/// `to_string()` already reads e.g. `Authentication error: ...`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct KustoError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl KustoError {
    /// Create an error of the given kind, prefixing the message.
    pub fn new(kind: ErrorKind, message: impl AsRef<str>) -> Self {
        Self {
            kind,
            message: format!("{}{}", kind.prefix(), message.as_ref()),
            source: None,
        }
    }

    /// Create a connection error.
    pub fn connection(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create a query error.
    pub fn query(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Query, message)
    }

    /// Create a resource-not-found error.
    pub fn resource_not_found(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a data conversion error.
    pub fn data_conversion(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::DataConversion, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create a generic error.
    pub fn generic(message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    /// Wrap a foreign error as [`ErrorKind::Generic`], keeping it as the source.
    ///
    /// Foreign errors are never upgraded to a more specific kind.
    pub fn from_foreign(error: impl StdError + Send + Sync + 'static) -> Self {
        Self::generic(error.to_string()).with_source(error)
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The error's kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The prefixed message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Format the error for operator display, e.g.
    /// `Kusto Connection Error: Connection error: host unreachable`.
    #[must_use]
    pub fn format(&self) -> String {
        format!("{}: {}", self.kind.label(), self.message)
    }

    /// Check if this error may succeed on retry.
    ///
    /// Nothing in this workspace retries; the hint is for callers.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.kind, ErrorKind::Connection | ErrorKind::Timeout)
    }
}

/// Check whether an arbitrary error is a [`KustoError`].
#[must_use]
pub fn is_kusto_error(error: &(dyn StdError + 'static)) -> bool {
    error.is::<KustoError>()
}
