//! Azure Identity backend.
//!
//! Builds credentials with the `azure_identity` crate. Supported methods:
//!
//! - **azure-cli**: `AzureCliCredential`
//! - **azure-identity**: ambient chain (environment service principal, then
//!   managed identity, then Azure CLI)
//!
//! The environment link and the environment method read the parameter set
//! handed to the resolver, not the process environment.
//! - **managed-identity**: system-assigned, or user-assigned by client ID
//! - **client-secret**: `ClientSecretCredential`
//! - **client-certificate**: `ClientCertificateCredential` (requires the
//!   `cert-auth` feature)
//! - **environment**: service principal described by the `AZURE_*` parameters
//!
//! The Rust Azure SDK has no interactive browser, device code, or
//! username/password credential; requests for those fail with a
//! [`BackendError`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use kusto_auth::{AzureIdentityBackend, CredentialResolver, ParameterSet, kusto_scope};
//!
//! let resolver = CredentialResolver::new(AzureIdentityBackend::new());
//! let credential = resolver.resolve(Some("managed-identity"), &ParameterSet::from_env())?;
//! let token = credential
//!     .get_token(&[&kusto_scope("https://mycluster.westus.kusto.windows.net")])
//!     .await?;
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use azure_core::credentials::{Secret, TokenCredential as AzureTokenCredential};
use azure_identity::{
    AzureCliCredential, ClientSecretCredential, ManagedIdentityCredential,
    ManagedIdentityCredentialOptions, UserAssignedId,
};
use kusto_error::KustoError;

use crate::backend::{CredentialRequest, IdentityBackend};
use crate::credential::{AccessToken, CredentialCapability, TokenCredential};
use crate::error::BackendError;
use crate::method::AuthMethod;
use crate::params::{ParamName, ParameterSet};

type SharedAzureCredential = Arc<dyn AzureTokenCredential>;

/// Identity backend built on `azure_identity`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureIdentityBackend;

impl AzureIdentityBackend {
    /// Create the backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdentityBackend for AzureIdentityBackend {
    fn create(&self, request: CredentialRequest) -> Result<CredentialCapability, BackendError> {
        let method = request.method();
        let credential: Arc<dyn TokenCredential> = match request {
            CredentialRequest::AzureCli => {
                Arc::new(AzureCredential::new("AzureCliCredential", azure_cli()?))
            }
            CredentialRequest::AzureIdentity { parameters } => {
                Arc::new(ambient_chain(&parameters)?)
            }
            CredentialRequest::ManagedIdentity { client_id } => Arc::new(AzureCredential::new(
                "ManagedIdentityCredential",
                managed_identity(client_id)?,
            )),
            CredentialRequest::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => Arc::new(AzureCredential::new(
                "ClientSecretCredential",
                client_secret_credential(&tenant_id, client_id, client_secret)?,
            )),
            CredentialRequest::ClientCertificate {
                tenant_id,
                client_id,
                certificate_path,
                certificate_password,
            } => Arc::new(AzureCredential::new(
                "ClientCertificateCredential",
                client_certificate_credential(
                    &tenant_id,
                    client_id,
                    &certificate_path,
                    certificate_password.as_deref(),
                )?,
            )),
            CredentialRequest::Environment { parameters } => Arc::new(AzureCredential::new(
                "EnvironmentCredential",
                environment_credential(&parameters)?,
            )),
            CredentialRequest::InteractiveBrowser { .. }
            | CredentialRequest::DeviceCode { .. }
            | CredentialRequest::UsernamePassword { .. } => {
                return Err(BackendError::unsupported(method));
            }
        };
        Ok(credential)
    }
}

fn azure_error(e: azure_core::Error) -> BackendError {
    BackendError::new(e.to_string()).with_source(e)
}

fn azure_cli() -> Result<SharedAzureCredential, BackendError> {
    let credential: SharedAzureCredential = AzureCliCredential::new(None).map_err(azure_error)?;
    Ok(credential)
}

fn managed_identity(client_id: Option<String>) -> Result<SharedAzureCredential, BackendError> {
    // An empty client ID means system-assigned.
    let options = client_id
        .filter(|id| !id.is_empty())
        .map(|id| ManagedIdentityCredentialOptions {
            user_assigned_id: Some(UserAssignedId::ClientId(id)),
            ..Default::default()
        });
    let credential: SharedAzureCredential =
        ManagedIdentityCredential::new(options).map_err(azure_error)?;
    Ok(credential)
}

fn client_secret_credential(
    tenant_id: &str,
    client_id: String,
    client_secret: String,
) -> Result<SharedAzureCredential, BackendError> {
    let credential: SharedAzureCredential =
        ClientSecretCredential::new(tenant_id, client_id, Secret::new(client_secret), None)
            .map_err(azure_error)?;
    Ok(credential)
}

#[cfg(feature = "cert-auth")]
fn client_certificate_credential(
    tenant_id: &str,
    client_id: String,
    certificate_path: &str,
    password: Option<&str>,
) -> Result<SharedAzureCredential, BackendError> {
    use azure_identity::{ClientCertificateCredential, ClientCertificateCredentialOptions};
    use base64::Engine;

    let bytes = std::fs::read(certificate_path).map_err(|e| {
        BackendError::new(format!(
            "failed to read client certificate {certificate_path}: {e}"
        ))
        .with_source(e)
    })?;

    // The SDK expects base64-encoded PKCS#12
    let certificate = if is_base64(&bytes) {
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    };

    let options = ClientCertificateCredentialOptions::new(
        azure_identity::TokenCredentialOptions::default(),
        false, // send_certificate_chain
    );

    let credential: SharedAzureCredential = ClientCertificateCredential::new(
        tenant_id.to_string(),
        client_id,
        Secret::new(certificate),
        Secret::new(password.unwrap_or_default().to_string()),
        options,
    )
    .map_err(azure_error)?;
    Ok(credential)
}

#[cfg(not(feature = "cert-auth"))]
fn client_certificate_credential(
    _tenant_id: &str,
    _client_id: String,
    _certificate_path: &str,
    _password: Option<&str>,
) -> Result<SharedAzureCredential, BackendError> {
    Err(BackendError::new(
        "Client Certificate authentication requires the `cert-auth` feature",
    ))
}

/// Check if bytes look like base64 text rather than raw PKCS#12.
#[cfg_attr(not(feature = "cert-auth"), allow(dead_code))]
fn is_base64(data: &[u8]) -> bool {
    !data.is_empty()
        && data.iter().all(|&b| {
            b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\n' | b'\r')
        })
}

/// Service principal from `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and either
/// `AZURE_CLIENT_SECRET` or `AZURE_CLIENT_CERTIFICATE_PATH`.
fn environment_credential(params: &ParameterSet) -> Result<SharedAzureCredential, BackendError> {
    let value = |name| params.get(name).filter(|v| !v.is_empty());

    let (Some(tenant_id), Some(client_id)) = (value(ParamName::TenantId), value(ParamName::ClientId))
    else {
        return Err(environment_not_configured());
    };

    if let Some(secret) = value(ParamName::ClientSecret) {
        return client_secret_credential(tenant_id, client_id.to_string(), secret.to_string());
    }
    if let Some(path) = value(ParamName::CertificatePath) {
        return client_certificate_credential(
            tenant_id,
            client_id.to_string(),
            path,
            value(ParamName::CertificatePassword),
        );
    }
    Err(environment_not_configured())
}

fn environment_not_configured() -> BackendError {
    BackendError::new(
        "EnvironmentCredential is unavailable: set AZURE_TENANT_ID, AZURE_CLIENT_ID, \
         and AZURE_CLIENT_SECRET or AZURE_CLIENT_CERTIFICATE_PATH",
    )
}

/// Links of the ambient chain, skipping any that cannot be built here.
fn ambient_chain(params: &ParameterSet) -> Result<ChainedCredential, BackendError> {
    let candidates: [(&'static str, Result<SharedAzureCredential, BackendError>); 3] = [
        ("EnvironmentCredential", environment_credential(params)),
        ("ManagedIdentityCredential", managed_identity(None)),
        ("AzureCliCredential", azure_cli()),
    ];

    let mut links = Vec::with_capacity(candidates.len());
    let mut skipped = Vec::new();
    for (name, candidate) in candidates {
        match candidate {
            Ok(credential) => links.push(AzureCredential::new(name, credential)),
            Err(e) => {
                tracing::debug!(credential = name, error = %e, "skipping credential in ambient chain");
                skipped.push(format!("{name}: {e}"));
            }
        }
    }

    if links.is_empty() {
        return Err(BackendError::new(format!(
            "{} found no usable credential ({})",
            AuthMethod::AzureIdentity.display_name(),
            skipped.join("; ")
        )));
    }
    Ok(ChainedCredential { links })
}

/// Adapts an `azure_core` credential to [`TokenCredential`].
struct AzureCredential {
    name: &'static str,
    inner: SharedAzureCredential,
}

impl AzureCredential {
    fn new(name: &'static str, inner: SharedAzureCredential) -> Self {
        Self { name, inner }
    }

    async fn acquire(&self, scopes: &[&str]) -> azure_core::Result<AccessToken> {
        let token = self.inner.get_token(scopes, None).await?;

        // Calculate time until expiration
        let now = time::OffsetDateTime::now_utc();
        let secret = token.token.secret().to_string();
        if token.expires_on > now {
            let diff = token.expires_on - now;
            let expires_in = Duration::from_secs(diff.whole_seconds().max(0).unsigned_abs());
            Ok(AccessToken::with_expiry(secret, expires_in))
        } else {
            Ok(AccessToken::new(secret))
        }
    }
}

impl fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredential")
            .field("name", &self.name)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenCredential for AzureCredential {
    async fn get_token(&self, scopes: &[&str]) -> kusto_error::Result<AccessToken> {
        self.acquire(scopes).await.map_err(|e| {
            KustoError::authentication(format!("{} failed to acquire token: {e}", self.name))
                .with_source(e)
        })
    }
}

/// Tries each credential in order; the first token wins.
struct ChainedCredential {
    links: Vec<AzureCredential>,
}

impl fmt::Debug for ChainedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.links.iter().map(|link| link.name))
            .finish()
    }
}

#[async_trait]
impl TokenCredential for ChainedCredential {
    async fn get_token(&self, scopes: &[&str]) -> kusto_error::Result<AccessToken> {
        let mut failures = Vec::with_capacity(self.links.len());
        for link in &self.links {
            match link.acquire(scopes).await {
                Ok(token) => return Ok(token),
                Err(e) => {
                    tracing::debug!(credential = link.name, error = %e, "credential in ambient chain failed");
                    failures.push(format!("{}: {e}", link.name));
                }
            }
        }
        Err(KustoError::authentication(format!(
            "no credential in the ambient chain produced a token ({})",
            failures.join("; ")
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // Tests that acquire tokens need a real Azure environment. They are
    // ignored by default and can be run manually with:
    // cargo test -p kusto-auth --features azure-identity -- --ignored

    #[test]
    fn test_is_base64() {
        assert!(is_base64(b"SGVsbG8gV29ybGQ="));
        assert!(is_base64(b"MIIC+jCCAeKgAwIBAgIJAL"));
        assert!(!is_base64(&[0x30, 0x82, 0x00, 0x01])); // DER/PKCS#12 header
        assert!(!is_base64(b""));
    }

    #[test]
    fn test_unsupported_flows() {
        let backend = AzureIdentityBackend::new();
        for request in [
            CredentialRequest::InteractiveBrowser {
                tenant_id: None,
                client_id: None,
            },
            CredentialRequest::DeviceCode {
                tenant_id: None,
                client_id: None,
                prompt: crate::backend::DevicePrompt::default(),
            },
            CredentialRequest::UsernamePassword {
                tenant_id: "t".into(),
                client_id: "c".into(),
                username: "u".into(),
                password: "p".into(),
            },
        ] {
            let method = request.method();
            let err = backend.create(request).unwrap_err();
            assert!(err.message().contains(method.display_name()));
        }
    }

    #[test]
    fn test_environment_requires_tenant_and_client() {
        let params = ParameterSet::new().with(ParamName::ClientSecret, "secret");
        let err = environment_credential(&params).unwrap_err();
        assert!(err.message().contains("AZURE_TENANT_ID"));
    }

    #[test]
    fn test_environment_reads_resolved_parameters() {
        let backend = AzureIdentityBackend::new();

        let err = backend
            .create(CredentialRequest::Environment {
                parameters: ParameterSet::new().with(ParamName::TenantId, "tenant"),
            })
            .unwrap_err();
        assert!(err.message().starts_with("EnvironmentCredential is unavailable"));

        let credential = backend
            .create(CredentialRequest::Environment {
                parameters: ParameterSet::new()
                    .with(ParamName::TenantId, "72f988bf-86f1-41af-91ab-2d7cd011db47")
                    .with(ParamName::ClientId, "04b07795-8ddb-461a-bbee-02f9e1bf7b46")
                    .with(ParamName::ClientSecret, "not-a-real-secret"),
            })
            .unwrap();
        assert!(format!("{credential:?}").contains("EnvironmentCredential"));
    }

    /// `azure_core` credential with a canned outcome.
    #[derive(Debug)]
    struct CannedAzureCredential {
        token: Option<&'static str>,
        lifetime: time::Duration,
    }

    impl CannedAzureCredential {
        fn issuing(token: &'static str) -> SharedAzureCredential {
            Arc::new(Self {
                token: Some(token),
                lifetime: time::Duration::hours(1),
            })
        }

        fn expired(token: &'static str) -> SharedAzureCredential {
            Arc::new(Self {
                token: Some(token),
                lifetime: time::Duration::minutes(-5),
            })
        }

        fn failing() -> SharedAzureCredential {
            Arc::new(Self {
                token: None,
                lifetime: time::Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl AzureTokenCredential for CannedAzureCredential {
        async fn get_token(
            &self,
            _scopes: &[&str],
            _options: Option<azure_core::credentials::TokenRequestOptions<'_>>,
        ) -> azure_core::Result<azure_core::credentials::AccessToken> {
            match self.token {
                Some(token) => Ok(azure_core::credentials::AccessToken::new(
                    token,
                    time::OffsetDateTime::now_utc() + self.lifetime,
                )),
                None => Err(azure_core::Error::with_message(
                    azure_core::error::ErrorKind::Credential,
                    "no account signed in",
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_token_expiry_maps_to_expires_in() {
        let credential = AzureCredential::new("Canned", CannedAzureCredential::issuing("tok"));
        let token = credential.get_token(&["scope"]).await.unwrap();

        assert_eq!(token.secret(), "tok");
        let expires_in = token.expires_in().unwrap();
        assert!(expires_in <= Duration::from_secs(3600));
        assert!(expires_in >= Duration::from_secs(3590), "{expires_in:?}");
    }

    #[tokio::test]
    async fn test_expired_token_has_no_expiry() {
        let credential = AzureCredential::new("Canned", CannedAzureCredential::expired("old"));
        let token = credential.get_token(&["scope"]).await.unwrap();
        assert_eq!(token.secret(), "old");
        assert_eq!(token.expires_in(), None);
    }

    #[tokio::test]
    async fn test_single_credential_failure_is_authentication() {
        let credential =
            AzureCredential::new("AzureCliCredential", CannedAzureCredential::failing());
        let err = credential.get_token(&["scope"]).await.unwrap_err();

        assert_eq!(err.kind(), kusto_error::ErrorKind::Authentication);
        assert_eq!(
            err.message(),
            "Authentication error: AzureCliCredential failed to acquire token: no account signed in"
        );
    }

    #[tokio::test]
    async fn test_chain_first_success_wins() {
        let chain = ChainedCredential {
            links: vec![
                AzureCredential::new("EnvironmentCredential", CannedAzureCredential::failing()),
                AzureCredential::new(
                    "ManagedIdentityCredential",
                    CannedAzureCredential::issuing("tok-b"),
                ),
                AzureCredential::new("AzureCliCredential", CannedAzureCredential::issuing("tok-c")),
            ],
        };

        let token = chain.get_token(&["scope"]).await.unwrap();
        assert_eq!(token.secret(), "tok-b");
        assert!(token.expires_in().is_some());
    }

    #[tokio::test]
    async fn test_chain_reports_every_failure() {
        let chain = ChainedCredential {
            links: vec![
                AzureCredential::new(
                    "ManagedIdentityCredential",
                    CannedAzureCredential::failing(),
                ),
                AzureCredential::new("AzureCliCredential", CannedAzureCredential::failing()),
            ],
        };

        let err = chain.get_token(&["scope"]).await.unwrap_err();

        assert_eq!(err.kind(), kusto_error::ErrorKind::Authentication);
        assert_eq!(
            err.message(),
            "Authentication error: no credential in the ambient chain produced a token \
             (ManagedIdentityCredential: no account signed in; \
             AzureCliCredential: no account signed in)"
        );
        assert_eq!(err.message().matches("Authentication error: ").count(), 1);
    }

    #[test]
    fn test_environment_requires_secret_or_certificate() {
        let params = ParameterSet::new()
            .with(ParamName::TenantId, "tenant")
            .with(ParamName::ClientId, "client");
        assert!(environment_credential(&params).is_err());
    }

    #[tokio::test]
    #[ignore = "Requires Azure CLI login"]
    async fn test_azure_cli_token() {
        let credential = AzureIdentityBackend::new()
            .create(CredentialRequest::AzureCli)
            .expect("Failed to create credential");
        let token = credential
            .get_token(&[crate::KUSTO_DEFAULT_SCOPE])
            .await
            .expect("Failed to get token");
        assert!(!token.secret().is_empty());
    }

    #[tokio::test]
    #[ignore = "Requires Azure Service Principal credentials"]
    async fn test_client_secret_token() {
        let tenant_id = std::env::var("AZURE_TENANT_ID").expect("AZURE_TENANT_ID not set");
        let client_id = std::env::var("AZURE_CLIENT_ID").expect("AZURE_CLIENT_ID not set");
        let client_secret =
            std::env::var("AZURE_CLIENT_SECRET").expect("AZURE_CLIENT_SECRET not set");

        let credential = AzureIdentityBackend::new()
            .create(CredentialRequest::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            })
            .expect("Failed to create credential");
        let token = credential
            .get_token(&[crate::KUSTO_DEFAULT_SCOPE])
            .await
            .expect("Failed to get token");
        assert!(!token.secret().is_empty());
    }
}
