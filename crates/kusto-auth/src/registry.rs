//! Strategy registry.
//!
//! Each [`AuthMethod`] is bound to a [`StrategyDefinition`]: the parameters it
//! requires, the ones it accepts optionally, and a recipe that turns validated
//! parameters into a [`CredentialRequest`]. The binding is an exhaustive
//! `match`, so adding a method without a strategy does not compile.

use once_cell::sync::Lazy;

use crate::backend::{CredentialRequest, DevicePrompt};
use crate::error::AuthError;
use crate::method::AuthMethod;
use crate::params::{ParamName, ParameterSet};

type Recipe = fn(&ValidatedParams<'_>) -> CredentialRequest;

static REGISTRY: Lazy<StrategyRegistry> = Lazy::new(StrategyRegistry::new);

/// Validation and construction recipe for one method.
#[derive(Debug, Clone, Copy)]
pub struct StrategyDefinition {
    method: AuthMethod,
    required: &'static [ParamName],
    optional: &'static [ParamName],
    recipe: Recipe,
}

impl StrategyDefinition {
    /// The method this strategy serves.
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// Parameters that must be present and non-empty, in order.
    #[must_use]
    pub fn required(&self) -> &'static [ParamName] {
        self.required
    }

    /// Parameters that are used when provided.
    #[must_use]
    pub fn optional(&self) -> &'static [ParamName] {
        self.optional
    }

    /// Check every required parameter, collecting all that are missing.
    pub fn validate<'a>(
        &self,
        params: &'a ParameterSet,
        prompt: &'a DevicePrompt,
    ) -> Result<ValidatedParams<'a>, AuthError> {
        let missing: Vec<ParamName> = self
            .required
            .iter()
            .copied()
            .filter(|name| !params.is_present(*name))
            .collect();

        if !missing.is_empty() {
            return Err(AuthError::MissingParameters {
                method: self.method,
                required: self.required,
                missing,
            });
        }

        Ok(ValidatedParams { params, prompt })
    }

    /// Run the construction recipe.
    #[must_use]
    pub fn build(&self, params: &ValidatedParams<'_>) -> CredentialRequest {
        (self.recipe)(params)
    }
}

/// Parameters that passed a strategy's validation.
///
/// Only [`StrategyDefinition::validate`] creates these.
#[derive(Debug)]
pub struct ValidatedParams<'a> {
    params: &'a ParameterSet,
    prompt: &'a DevicePrompt,
}

impl ValidatedParams<'_> {
    /// A required parameter's value.
    ///
    /// Validation guarantees the parameter is present for the strategy that
    /// declared it.
    fn required(&self, name: ParamName) -> String {
        self.params.get(name).unwrap_or_default().to_string()
    }

    /// An optional parameter's value, exactly as provided.
    fn optional(&self, name: ParamName) -> Option<String> {
        self.params.get(name).map(str::to_string)
    }

    /// Every parameter the caller supplied, for backends that read their own.
    fn snapshot(&self) -> ParameterSet {
        self.params.clone()
    }
}

/// Immutable, process-wide registry of strategies.
#[derive(Debug)]
pub struct StrategyRegistry {
    definitions: Vec<StrategyDefinition>,
}

impl StrategyRegistry {
    fn new() -> Self {
        Self {
            definitions: AuthMethod::ALL.into_iter().map(definition).collect(),
        }
    }

    /// The shared registry, built on first use.
    #[must_use]
    pub fn global() -> &'static StrategyRegistry {
        &REGISTRY
    }

    /// Find the strategy for a method identifier.
    ///
    /// `None` or an empty identifier selects the default method
    /// (`azure-identity`).
    pub fn lookup(&self, method: Option<&str>) -> Result<&StrategyDefinition, AuthError> {
        let method = match method.map(str::trim) {
            None | Some("") => AuthMethod::default(),
            Some(identifier) => identifier.parse()?,
        };
        Ok(self.get(method))
    }

    /// The strategy for a known method.
    #[must_use]
    pub fn get(&self, method: AuthMethod) -> &StrategyDefinition {
        &self.definitions[method as usize]
    }

    /// All strategies, in canonical method order.
    pub fn iter(&self) -> impl Iterator<Item = &StrategyDefinition> {
        self.definitions.iter()
    }
}

fn definition(method: AuthMethod) -> StrategyDefinition {
    use ParamName::*;

    let (required, optional, recipe): (&'static [ParamName], &'static [ParamName], Recipe) =
        match method {
            AuthMethod::AzureCli => (&[], &[], |_| CredentialRequest::AzureCli),
            AuthMethod::AzureIdentity => (&[], &[], |p| CredentialRequest::AzureIdentity {
                parameters: p.snapshot(),
            }),
            AuthMethod::ManagedIdentity => (&[], &[ClientId], |p| {
                CredentialRequest::ManagedIdentity {
                    client_id: p.optional(ClientId),
                }
            }),
            AuthMethod::ClientSecret => (&[TenantId, ClientId, ClientSecret], &[], |p| {
                CredentialRequest::ClientSecret {
                    tenant_id: p.required(TenantId),
                    client_id: p.required(ClientId),
                    client_secret: p.required(ClientSecret),
                }
            }),
            AuthMethod::ClientCertificate => (
                &[TenantId, ClientId, CertificatePath],
                &[CertificatePassword],
                |p| CredentialRequest::ClientCertificate {
                    tenant_id: p.required(TenantId),
                    client_id: p.required(ClientId),
                    certificate_path: p.required(CertificatePath),
                    certificate_password: p.optional(CertificatePassword),
                },
            ),
            AuthMethod::InteractiveBrowser => (&[], &[TenantId, ClientId], |p| {
                CredentialRequest::InteractiveBrowser {
                    tenant_id: p.optional(TenantId),
                    client_id: p.optional(ClientId),
                }
            }),
            AuthMethod::DeviceCode => (&[], &[TenantId, ClientId], |p| {
                CredentialRequest::DeviceCode {
                    tenant_id: p.optional(TenantId),
                    client_id: p.optional(ClientId),
                    prompt: p.prompt.clone(),
                }
            }),
            AuthMethod::UsernamePassword => (
                &[TenantId, ClientId, Username, Password],
                &[],
                |p| CredentialRequest::UsernamePassword {
                    tenant_id: p.required(TenantId),
                    client_id: p.required(ClientId),
                    username: p.required(Username),
                    password: p.required(Password),
                },
            ),
            AuthMethod::Environment => (&[], &[], |p| CredentialRequest::Environment {
                parameters: p.snapshot(),
            }),
        };

    StrategyDefinition {
        method,
        required,
        optional,
        recipe,
    }
}
