//! Identity backend interface.
//!
//! The resolver validates parameters and decides *which* credential to build;
//! an [`IdentityBackend`] decides *how*. Backends receive a fully validated
//! [`CredentialRequest`] and return a [`CredentialCapability`].

use std::fmt;
use std::sync::Arc;

use crate::credential::CredentialCapability;
use crate::error::BackendError;
use crate::method::AuthMethod;
use crate::params::ParameterSet;

/// Side channel for device-code sign-in instructions.
///
/// The backend calls [`DevicePrompt::show`] when it needs the operator to
/// visit a URL and enter a code. The message is passed through verbatim; it
/// is meant for the operator and is never sanitized.
#[derive(Clone)]
pub struct DevicePrompt(Arc<dyn Fn(&str) + Send + Sync>);

impl DevicePrompt {
    /// Create a prompt that forwards messages to `f`.
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Surface a message to the operator.
    pub fn show(&self, message: &str) {
        (self.0)(message);
    }
}

impl Default for DevicePrompt {
    /// Logs the message at `warn` level on the `kusto_auth::device_code` target.
    fn default() -> Self {
        Self::new(|message| {
            tracing::warn!(target: "kusto_auth::device_code", "{message}");
        })
    }
}

impl fmt::Debug for DevicePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DevicePrompt").finish_non_exhaustive()
    }
}

/// A validated description of the credential to build.
///
/// Required parameters are plain `String`s and are guaranteed non-empty.
/// Optional parameters are passed through exactly as provided, so `None`
/// (not provided) and `Some("")` (provided but empty) stay distinct.
#[derive(Clone)]
pub enum CredentialRequest {
    /// Token from the locally signed-in Azure CLI.
    AzureCli,
    /// Ambient credential chain.
    AzureIdentity {
        /// Parameters the chain's environment link reads.
        parameters: ParameterSet,
    },
    /// Managed identity; system-assigned unless a client ID is given.
    ManagedIdentity {
        /// Client ID of a user-assigned identity.
        client_id: Option<String>,
    },
    /// Service principal with a client secret.
    ClientSecret {
        /// Tenant ID.
        tenant_id: String,
        /// Client ID.
        client_id: String,
        /// Client secret.
        client_secret: String,
    },
    /// Service principal with a certificate.
    ClientCertificate {
        /// Tenant ID.
        tenant_id: String,
        /// Client ID.
        client_id: String,
        /// Path to the certificate file.
        certificate_path: String,
        /// Optional password for the certificate's private key.
        certificate_password: Option<String>,
    },
    /// Interactive browser sign-in.
    InteractiveBrowser {
        /// Tenant ID.
        tenant_id: Option<String>,
        /// Client ID.
        client_id: Option<String>,
    },
    /// Device code sign-in.
    DeviceCode {
        /// Tenant ID.
        tenant_id: Option<String>,
        /// Client ID.
        client_id: Option<String>,
        /// Where to send the sign-in instructions.
        prompt: DevicePrompt,
    },
    /// Resource owner password credentials.
    UsernamePassword {
        /// Tenant ID.
        tenant_id: String,
        /// Client ID.
        client_id: String,
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// Service principal described by the `AZURE_*` parameters.
    Environment {
        /// Parameters the backend reads the service principal from.
        parameters: ParameterSet,
    },
}

impl CredentialRequest {
    /// The method this request was built for.
    #[must_use]
    pub fn method(&self) -> AuthMethod {
        match self {
            Self::AzureCli => AuthMethod::AzureCli,
            Self::AzureIdentity { .. } => AuthMethod::AzureIdentity,
            Self::ManagedIdentity { .. } => AuthMethod::ManagedIdentity,
            Self::ClientSecret { .. } => AuthMethod::ClientSecret,
            Self::ClientCertificate { .. } => AuthMethod::ClientCertificate,
            Self::InteractiveBrowser { .. } => AuthMethod::InteractiveBrowser,
            Self::DeviceCode { .. } => AuthMethod::DeviceCode,
            Self::UsernamePassword { .. } => AuthMethod::UsernamePassword,
            Self::Environment { .. } => AuthMethod::Environment,
        }
    }
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose sensitive data in debug output
        match self {
            Self::AzureCli => f.write_str("AzureCli"),
            Self::AzureIdentity { parameters } => f
                .debug_struct("AzureIdentity")
                .field("parameters", parameters)
                .finish(),
            Self::ManagedIdentity { client_id } => f
                .debug_struct("ManagedIdentity")
                .field("client_id", client_id)
                .finish(),
            Self::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .finish(),
            Self::ClientCertificate {
                tenant_id,
                client_id,
                certificate_path,
                certificate_password,
            } => f
                .debug_struct("ClientCertificate")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("certificate_path", certificate_path)
                .field(
                    "certificate_password",
                    &certificate_password.as_ref().map(|_| "[REDACTED]"),
                )
                .finish(),
            Self::InteractiveBrowser {
                tenant_id,
                client_id,
            } => f
                .debug_struct("InteractiveBrowser")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish(),
            Self::DeviceCode {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("DeviceCode")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .finish_non_exhaustive(),
            Self::UsernamePassword {
                tenant_id,
                client_id,
                username,
                ..
            } => f
                .debug_struct("UsernamePassword")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Environment { parameters } => f
                .debug_struct("Environment")
                .field("parameters", parameters)
                .finish(),
        }
    }
}

/// Trait for identity backends.
///
/// A backend turns a validated request into a credential capability. It may
/// fail (missing tooling, unreadable certificate, unsupported flow); the
/// resolver wraps every such failure into a single authentication error
/// shape.
pub trait IdentityBackend: Send + Sync {
    /// Build a credential for the request.
    fn create(&self, request: CredentialRequest) -> Result<CredentialCapability, BackendError>;
}

impl<B: IdentityBackend + ?Sized> IdentityBackend for Arc<B> {
    fn create(&self, request: CredentialRequest) -> Result<CredentialCapability, BackendError> {
        (**self).create(request)
    }
}

impl<B: IdentityBackend + ?Sized> IdentityBackend for &B {
    fn create(&self, request: CredentialRequest) -> Result<CredentialCapability, BackendError> {
        (**self).create(request)
    }
}
