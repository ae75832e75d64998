//! Authentication method identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Comma-separated list of every supported identifier, in canonical order.
pub const SUPPORTED_METHODS: &str = "azure-cli, azure-identity, managed-identity, client-secret, \
     client-certificate, interactive-browser, device-code, username-password, environment";

/// Authentication method enumeration.
///
/// Identifiers are matched case-insensitively. The discriminants follow
/// [`AuthMethod::ALL`], which is also the order used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMethod {
    /// Token from the locally signed-in Azure CLI.
    AzureCli,
    /// Ambient credential chain; the default.
    #[default]
    AzureIdentity,
    /// Azure Managed Identity (system- or user-assigned).
    ManagedIdentity,
    /// Service principal with a client secret.
    ClientSecret,
    /// Service principal with an X.509 certificate.
    ClientCertificate,
    /// Interactive sign-in through a browser.
    InteractiveBrowser,
    /// Device code flow.
    DeviceCode,
    /// Resource owner password credentials.
    UsernamePassword,
    /// Service principal described by `AZURE_*` environment variables.
    Environment,
}

impl AuthMethod {
    /// All methods, in canonical order.
    pub const ALL: [AuthMethod; 9] = [
        Self::AzureCli,
        Self::AzureIdentity,
        Self::ManagedIdentity,
        Self::ClientSecret,
        Self::ClientCertificate,
        Self::InteractiveBrowser,
        Self::DeviceCode,
        Self::UsernamePassword,
        Self::Environment,
    ];

    /// The canonical lowercase identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AzureCli => "azure-cli",
            Self::AzureIdentity => "azure-identity",
            Self::ManagedIdentity => "managed-identity",
            Self::ClientSecret => "client-secret",
            Self::ClientCertificate => "client-certificate",
            Self::InteractiveBrowser => "interactive-browser",
            Self::DeviceCode => "device-code",
            Self::UsernamePassword => "username-password",
            Self::Environment => "environment",
        }
    }

    /// Get the authentication method name used in diagnostics.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::AzureCli => "Azure CLI",
            Self::AzureIdentity => "Azure Identity",
            Self::ManagedIdentity => "Managed Identity",
            Self::ClientSecret => "Client Secret",
            Self::ClientCertificate => "Client Certificate",
            Self::InteractiveBrowser => "Interactive Browser",
            Self::DeviceCode => "Device Code",
            Self::UsernamePassword => "Username/Password",
            Self::Environment => "Environment Credential",
        }
    }

    /// Parse an identifier, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(identifier: &str) -> Option<Self> {
        let identifier = identifier.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(identifier))
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AuthError::UnsupportedMethod {
            method: s.to_string(),
        })
    }
}
