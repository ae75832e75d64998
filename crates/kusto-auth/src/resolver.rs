//! Credential resolution.
//!
//! Resolution is a one-shot, synchronous function of the method identifier and
//! the parameter set:
//!
//! 1. Look up the strategy (unknown identifiers are rejected with the list of
//!    supported methods).
//! 2. Validate every required parameter, reporting all that are missing.
//! 3. Build the credential request and hand it to the identity backend.
//! 4. Wrap any backend failure as `Failed to create token credential: ...`.
//!
//! Nothing is retried and nothing is cached.

use crate::backend::{DevicePrompt, IdentityBackend};
use crate::config::AuthConfig;
use crate::credential::CredentialCapability;
use crate::error::AuthError;
use crate::params::ParameterSet;
use crate::registry::StrategyRegistry;

/// Resolves authentication methods into credential capabilities.
///
/// # Example
///
/// ```rust,ignore
/// use kusto_auth::{AzureIdentityBackend, CredentialResolver, ParameterSet};
///
/// let resolver = CredentialResolver::new(AzureIdentityBackend::new());
/// let credential = resolver.resolve(Some("azure-cli"), &ParameterSet::from_env())?;
/// let token = credential.get_token(&[kusto_auth::KUSTO_DEFAULT_SCOPE]).await?;
/// ```
#[derive(Debug)]
pub struct CredentialResolver<B> {
    backend: B,
    prompt: DevicePrompt,
    registry: &'static StrategyRegistry,
}

impl<B: IdentityBackend> CredentialResolver<B> {
    /// Create a resolver backed by `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            prompt: DevicePrompt::default(),
            registry: StrategyRegistry::global(),
        }
    }

    /// Route device-code sign-in instructions to `prompt`.
    #[must_use]
    pub fn with_device_prompt(mut self, prompt: DevicePrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// The identity backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve `method` into a credential.
    ///
    /// `None` or an empty identifier selects `azure-identity`.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the method is unknown, a required
    /// parameter is missing or empty, or the backend fails to build the
    /// credential.
    pub fn resolve(
        &self,
        method: Option<&str>,
        params: &ParameterSet,
    ) -> Result<CredentialCapability, AuthError> {
        let strategy = self.registry.lookup(method)?;
        let method = strategy.method();

        tracing::debug!(
            method = %method,
            "Using {} authentication",
            method.display_name()
        );

        let validated = strategy.validate(params, &self.prompt)?;
        let request = strategy.build(&validated);

        self.backend.create(request).map_err(|e| {
            tracing::error!(
                method = %method,
                error = %e,
                "Failed to create token credential: {e}"
            );
            AuthError::Construction {
                method,
                message: e.to_string(),
            }
        })
    }

    /// Resolve the default method (`azure-identity`).
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the backend fails to build the credential.
    pub fn resolve_default(&self, params: &ParameterSet) -> Result<CredentialCapability, AuthError> {
        self.resolve(None, params)
    }

    /// Resolve the method and parameters from a configuration.
    ///
    /// # Errors
    ///
    /// See [`CredentialResolver::resolve`].
    pub fn resolve_config(&self, config: &AuthConfig) -> Result<CredentialCapability, AuthError> {
        self.resolve(config.method(), &config.parameters)
    }
}
