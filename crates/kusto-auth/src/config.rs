//! Authentication configuration.

use crate::method::AuthMethod;
use crate::params::{ParamName, ParameterSet};

/// Environment variable holding the authentication method identifier.
pub const AUTH_METHOD_ENV_VAR: &str = "KUSTO_AUTH_METHOD";

/// Which method to use and the parameters to feed it.
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future minor versions without breaking changes. Use the builder
/// pattern methods or [`Default::default()`] to construct instances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct AuthConfig {
    /// Method identifier as configured; `None` selects the default method.
    ///
    /// Kept as the raw string so that an unknown identifier is reported by
    /// the resolver with the list of supported methods.
    pub method: Option<String>,

    /// Parameter values.
    pub parameters: ParameterSet,
}

impl AuthConfig {
    /// Create an empty configuration (default method, no parameters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the method and every parameter from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the method and every parameter through `lookup`, keyed by
    /// environment variable name.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let method = lookup(AUTH_METHOD_ENV_VAR);
        Self {
            method,
            parameters: ParameterSet::from_lookup(lookup),
        }
    }

    /// Set the method identifier.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set a known method.
    #[must_use]
    pub fn with_auth_method(self, method: AuthMethod) -> Self {
        self.with_method(method.as_str())
    }

    /// Set a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: ParamName, value: impl Into<String>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// The configured identifier, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }
}
