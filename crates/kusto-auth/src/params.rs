//! Named configuration parameters consumed by the authentication strategies.

use std::collections::HashMap;
use std::fmt;

/// Logical parameter names.
///
/// Each name is bound to the environment variable it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamName {
    /// Azure AD tenant ID.
    TenantId,
    /// Application (client) ID.
    ClientId,
    /// Client secret for a service principal.
    ClientSecret,
    /// Path to a PKCS#12 or PEM client certificate.
    CertificatePath,
    /// Password protecting the certificate's private key.
    CertificatePassword,
    /// User principal name.
    Username,
    /// User password.
    Password,
}

impl ParamName {
    /// All parameter names.
    pub const ALL: [ParamName; 7] = [
        Self::TenantId,
        Self::ClientId,
        Self::ClientSecret,
        Self::CertificatePath,
        Self::CertificatePassword,
        Self::Username,
        Self::Password,
    ];

    /// The environment variable this parameter is read from.
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Self::TenantId => "AZURE_TENANT_ID",
            Self::ClientId => "AZURE_CLIENT_ID",
            Self::ClientSecret => "AZURE_CLIENT_SECRET",
            Self::CertificatePath => "AZURE_CLIENT_CERTIFICATE_PATH",
            Self::CertificatePassword => "AZURE_CLIENT_CERTIFICATE_PASSWORD",
            Self::Username => "AZURE_USERNAME",
            Self::Password => "AZURE_PASSWORD",
        }
    }

    /// Check if values of this parameter must never be displayed.
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            Self::ClientSecret | Self::CertificatePassword | Self::Password
        )
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// A set of parameter values.
///
/// A parameter that was never provided (`None`) is distinct from one that was
/// provided but empty (`Some("")`). Strategies treat an empty *required*
/// parameter as missing, and receive optional parameters exactly as given.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    values: HashMap<ParamName, String>,
}

impl ParameterSet {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every parameter from the process environment.
    ///
    /// Variables that are unset or not valid UTF-8 are treated as not
    /// provided.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read every parameter through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let values = ParamName::ALL
            .into_iter()
            .filter_map(|name| lookup(name.env_var()).map(|value| (name, value)))
            .collect();
        Self { values }
    }

    /// Set a parameter, returning the set for chaining.
    #[must_use]
    pub fn with(mut self, name: ParamName, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter.
    pub fn insert(&mut self, name: ParamName, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove(&mut self, name: ParamName) -> Option<String> {
        self.values.remove(&name)
    }

    /// Get a parameter's value as provided.
    #[must_use]
    pub fn get(&self, name: ParamName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    /// Check if a parameter is present and non-empty.
    #[must_use]
    pub fn is_present(&self, name: ParamName) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }

    /// Number of parameters provided (including empty ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no parameters were provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose sensitive data in debug output
        let mut map = f.debug_map();
        for name in ParamName::ALL {
            if let Some(value) = self.get(name) {
                if name.is_secret() {
                    map.entry(&name.env_var(), &"[REDACTED]");
                } else {
                    map.entry(&name.env_var(), &value);
                }
            }
        }
        map.finish()
    }
}

impl<S: Into<String>> FromIterator<(ParamName, S)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (ParamName, S)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let params = ParameterSet::new().with(ParamName::ClientId, "");
        assert_eq!(params.get(ParamName::ClientId), Some(""));
        assert_eq!(params.get(ParamName::TenantId), None);
        assert!(!params.is_present(ParamName::ClientId));
        assert!(!params.is_present(ParamName::TenantId));
    }

    #[test]
    fn test_from_lookup_uses_env_var_names() {
        let params = ParameterSet::from_lookup(|name| match name {
            "AZURE_TENANT_ID" => Some("tenant".into()),
            "AZURE_CLIENT_CERTIFICATE_PATH" => Some("/etc/cert.pfx".into()),
            "AZURE_PASSWORD" => Some(String::new()),
            _ => None,
        });
        assert_eq!(params.len(), 3);
        assert_eq!(params.get(ParamName::TenantId), Some("tenant"));
        assert_eq!(params.get(ParamName::CertificatePath), Some("/etc/cert.pfx"));
        assert_eq!(params.get(ParamName::Password), Some(""));
        assert_eq!(params.get(ParamName::ClientId), None);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let params = ParameterSet::new()
            .with(ParamName::ClientId, "app-id")
            .with(ParamName::ClientSecret, "hunter2")
            .with(ParamName::Password, "p@ss")
            .with(ParamName::CertificatePassword, "certpw");
        let debug = format!("{params:?}");
        assert!(debug.contains("app-id"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("p@ss"));
        assert!(!debug.contains("certpw"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut params: ParameterSet = [(ParamName::Username, "alice")].into_iter().collect();
        assert!(params.is_present(ParamName::Username));
        assert_eq!(params.remove(ParamName::Username).as_deref(), Some("alice"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_env_var_names() {
        assert_eq!(ParamName::TenantId.to_string(), "AZURE_TENANT_ID");
        assert_eq!(
            ParamName::CertificatePassword.env_var(),
            "AZURE_CLIENT_CERTIFICATE_PASSWORD"
        );
    }
}
