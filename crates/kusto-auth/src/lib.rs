//! # kusto-auth
//!
//! Authentication strategy resolution for Kusto (Azure Data Explorer) clients.
//!
//! A [`CredentialResolver`] takes an authentication method identifier and a
//! [`ParameterSet`], validates the parameters the method needs, and asks an
//! [`IdentityBackend`] to build a [`CredentialCapability`]: an opaque value
//! that produces bearer tokens. Every failure is an [`AuthError`], which
//! converts into a [`kusto_error::KustoError`] of kind Authentication.
//!
//! ## Supported Authentication Methods
//!
//! | Method | Required | Optional |
//! |--------|----------|----------|
//! | `azure-cli` | - | - |
//! | `azure-identity` (default) | - | - |
//! | `managed-identity` | - | `AZURE_CLIENT_ID` |
//! | `client-secret` | `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET` | - |
//! | `client-certificate` | `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_CERTIFICATE_PATH` | `AZURE_CLIENT_CERTIFICATE_PASSWORD` |
//! | `interactive-browser` | - | `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` |
//! | `device-code` | - | `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` |
//! | `username-password` | `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_USERNAME`, `AZURE_PASSWORD` | - |
//! | `environment` | - | - |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `azure-identity` | [`AzureIdentityBackend`] built on the `azure_identity` crate |
//! | `cert-auth` | Client certificate support in the Azure backend |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod credential;
pub mod error;
pub mod method;
pub mod params;
pub mod registry;
pub mod resolver;

#[cfg(feature = "azure-identity")]
pub mod azure_identity_backend;

pub use backend::{CredentialRequest, DevicePrompt, IdentityBackend};
pub use config::{AUTH_METHOD_ENV_VAR, AuthConfig};
pub use credential::{
    AccessToken, CredentialCapability, KUSTO_DEFAULT_SCOPE, TokenCredential, kusto_scope,
};
pub use error::{AuthError, BackendError};
pub use method::{AuthMethod, SUPPORTED_METHODS};
pub use params::{ParamName, ParameterSet};
pub use registry::{StrategyDefinition, StrategyRegistry, ValidatedParams};
pub use resolver::CredentialResolver;

#[cfg(feature = "azure-identity")]
pub use azure_identity_backend::AzureIdentityBackend;
