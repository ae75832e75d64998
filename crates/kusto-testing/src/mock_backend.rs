//! In-memory identity backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use kusto_auth::{
    AccessToken, AuthMethod, BackendError, CredentialCapability, CredentialRequest, DevicePrompt,
    IdentityBackend, TokenCredential,
};
use parking_lot::Mutex;

/// Sign-in instructions the mock shows for device-code credentials.
pub const DEVICE_CODE_MESSAGE: &str = "To sign in, use a web browser to open the page \
     https://microsoft.com/devicelogin and enter the code ABCD-1234 to authenticate.";

/// Default token handed out by [`StaticCredential`].
const DEFAULT_TOKEN: &str = "mock-access-token";

/// Identity backend that records every request.
///
/// Credentials it returns hand out a fixed token. Individual methods can be
/// configured to fail at construction time.
#[derive(Debug)]
pub struct MockBackend {
    token: String,
    requests: Mutex<Vec<CredentialRequest>>,
    failures: HashMap<AuthMethod, String>,
}

impl MockBackend {
    /// Create a backend that succeeds for every method.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: DEFAULT_TOKEN.to_string(),
            requests: Mutex::new(Vec::new()),
            failures: HashMap::new(),
        }
    }

    /// Use `token` for every credential this backend builds.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Fail construction for `method` with `message`.
    #[must_use]
    pub fn fail_on(mut self, method: AuthMethod, message: impl Into<String>) -> Self {
        self.failures.insert(method, message.into());
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<CredentialRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<CredentialRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityBackend for MockBackend {
    fn create(&self, request: CredentialRequest) -> Result<CredentialCapability, BackendError> {
        let method = request.method();
        self.requests.lock().push(request.clone());

        if let Some(message) = self.failures.get(&method) {
            return Err(BackendError::new(message.clone()));
        }

        let prompt = match request {
            CredentialRequest::DeviceCode { prompt, .. } => Some(prompt),
            _ => None,
        };
        Ok(Arc::new(StaticCredential {
            method,
            token: self.token.clone(),
            prompt,
        }))
    }
}

/// Credential that always returns the same token.
///
/// Device-code credentials show [`DEVICE_CODE_MESSAGE`] through their prompt
/// on every token request, as a real device flow would.
pub struct StaticCredential {
    method: AuthMethod,
    token: String,
    prompt: Option<DevicePrompt>,
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredential")
            .field("method", &self.method)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenCredential for StaticCredential {
    async fn get_token(&self, _scopes: &[&str]) -> kusto_error::Result<AccessToken> {
        if let Some(prompt) = &self.prompt {
            prompt.show(DEVICE_CODE_MESSAGE);
        }
        Ok(AccessToken::new(self.token.clone()))
    }
}

/// Collects device-code prompts for assertions.
#[derive(Debug, Clone, Default)]
pub struct PromptRecorder {
    messages: Arc<Mutex<Vec<String>>>,
}

impl PromptRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A prompt that appends every message to this recorder.
    pub fn prompt(&self) -> DevicePrompt {
        let messages = Arc::clone(&self.messages);
        DevicePrompt::new(move |message| messages.lock().push(message.to_string()))
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}
