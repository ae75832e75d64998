//! Authentication error types.

use std::error::Error as StdError;

use kusto_error::{ErrorKind, KustoError};
use thiserror::Error;

use crate::method::{AuthMethod, SUPPORTED_METHODS};
use crate::params::ParamName;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors that can occur while resolving a credential.
///
/// Every variant is an authentication failure; converting into
/// [`KustoError`] always yields [`ErrorKind::Authentication`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// The method identifier is not one of the supported methods.
    #[error("Unsupported authentication method: {method}. Supported methods: {}", SUPPORTED_METHODS)]
    UnsupportedMethod {
        /// The identifier as given by the caller.
        method: String,
    },

    /// One or more required parameters are absent or empty.
    #[error("{}", missing_parameters_message(.method, .required, .missing))]
    MissingParameters {
        /// The selected method.
        method: AuthMethod,
        /// Every parameter the method requires.
        required: &'static [ParamName],
        /// The required parameters that were absent or empty.
        missing: Vec<ParamName>,
    },

    /// The identity backend failed to build the credential.
    #[error("Failed to create token credential: {message}")]
    Construction {
        /// The selected method.
        method: AuthMethod,
        /// The backend's error message.
        message: String,
    },
}

impl AuthError {
    /// The taxonomy kind of this error, always [`ErrorKind::Authentication`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Authentication
    }

    /// The method that was selected, if the identifier was recognised.
    #[must_use]
    pub fn method(&self) -> Option<AuthMethod> {
        match self {
            Self::UnsupportedMethod { .. } => None,
            Self::MissingParameters { method, .. } | Self::Construction { method, .. } => {
                Some(*method)
            }
        }
    }

    /// The missing parameters, empty unless this is [`AuthError::MissingParameters`].
    #[must_use]
    pub fn missing_parameters(&self) -> &[ParamName] {
        match self {
            Self::MissingParameters { missing, .. } => missing,
            _ => &[],
        }
    }
}

impl From<AuthError> for KustoError {
    fn from(err: AuthError) -> Self {
        KustoError::authentication(err.to_string()).with_source(err)
    }
}

fn missing_parameters_message(
    method: &AuthMethod,
    required: &[ParamName],
    missing: &[ParamName],
) -> String {
    let required: Vec<&str> = required.iter().map(|p| p.env_var()).collect();
    let missing: Vec<&str> = missing.iter().map(|p| p.env_var()).collect();
    let noun = if required.len() == 1 {
        "environment variable"
    } else {
        "environment variables"
    };
    format!(
        "{} authentication requires {} {} (missing: {})",
        method.display_name(),
        join_with_and(&required),
        noun,
        missing.join(", ")
    )
}

/// Join as `a`, `a and b`, or `a, b, and c`.
fn join_with_and(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// Error reported by an identity backend while building a credential.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl BackendError {
    /// Create a backend error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// The backend cannot build credentials for this method.
    pub fn unsupported(method: AuthMethod) -> Self {
        Self::new(format!(
            "{} authentication is not supported by this identity backend",
            method.display_name()
        ))
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_with_and() {
        assert_eq!(join_with_and(&[]), "");
        assert_eq!(join_with_and(&["A"]), "A");
        assert_eq!(join_with_and(&["A", "B"]), "A and B");
        assert_eq!(join_with_and(&["A", "B", "C"]), "A, B, and C");
    }

    #[test]
    fn test_missing_parameters_message() {
        let err = AuthError::MissingParameters {
            method: AuthMethod::ClientSecret,
            required: &[
                ParamName::TenantId,
                ParamName::ClientId,
                ParamName::ClientSecret,
            ],
            missing: vec![ParamName::ClientSecret],
        };
        assert_eq!(
            err.to_string(),
            "Client Secret authentication requires AZURE_TENANT_ID, AZURE_CLIENT_ID, \
             and AZURE_CLIENT_SECRET environment variables (missing: AZURE_CLIENT_SECRET)"
        );
        assert_eq!(err.missing_parameters(), &[ParamName::ClientSecret]);
        assert_eq!(err.method(), Some(AuthMethod::ClientSecret));
    }

    #[test]
    fn test_into_kusto_error_is_authentication() {
        let err = AuthError::Construction {
            method: AuthMethod::AzureCli,
            message: "az not found".into(),
        };
        let kusto = KustoError::from(err);
        assert_eq!(kusto.kind(), ErrorKind::Authentication);
        assert_eq!(
            kusto.message(),
            "Authentication error: Failed to create token credential: az not found"
        );
        assert!(kusto.source().is_some());
    }

    #[test]
    fn test_every_variant_is_authentication() {
        let errors = [
            AuthError::UnsupportedMethod {
                method: "x".into(),
            },
            AuthError::MissingParameters {
                method: AuthMethod::UsernamePassword,
                required: &[ParamName::Username],
                missing: vec![ParamName::Username],
            },
            AuthError::Construction {
                method: AuthMethod::Environment,
                message: "m".into(),
            },
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Authentication);
        }
    }

    #[test]
    fn test_backend_error_source() {
        let err = BackendError::new("az login required")
            .with_source(std::io::Error::other("exit status 1"));
        assert_eq!(err.to_string(), "az login required");
        assert_eq!(err.message(), "az login required");
        assert!(err.source().is_some());
    }
}
