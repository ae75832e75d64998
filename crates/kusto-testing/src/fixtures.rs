//! Parameter fixtures.

use kusto_auth::{AuthMethod, ParamName, ParameterSet, StrategyRegistry};

/// Sample value used for `name` in every fixture.
#[must_use]
pub fn sample_value(name: ParamName) -> &'static str {
    match name {
        ParamName::TenantId => "72f988bf-86f1-41af-91ab-2d7cd011db47",
        ParamName::ClientId => "04b07795-8ddb-461a-bbee-02f9e1bf7b46",
        ParamName::ClientSecret => "fixture-client-secret",
        ParamName::CertificatePath => "/etc/kusto/client.pem",
        ParamName::CertificatePassword => "fixture-cert-password",
        ParamName::Username => "analyst@contoso.com",
        ParamName::Password => "fixture-password",
    }
}

/// Every parameter set to its sample value.
#[must_use]
pub fn complete_parameters() -> ParameterSet {
    ParamName::ALL
        .iter()
        .map(|&name| (name, sample_value(name)))
        .collect()
}

/// Only the parameters `method` requires, set to their sample values.
#[must_use]
pub fn required_parameters(method: AuthMethod) -> ParameterSet {
    StrategyRegistry::global()
        .get(method)
        .required()
        .iter()
        .map(|&name| (name, sample_value(name)))
        .collect()
}

/// The required parameters of `method`, with `name` left out.
#[must_use]
pub fn parameters_without(method: AuthMethod, name: ParamName) -> ParameterSet {
    let mut params = required_parameters(method);
    params.remove(name);
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_parameters() {
        let params = complete_parameters();
        assert_eq!(params.len(), ParamName::ALL.len());
        assert!(ParamName::ALL.iter().all(|&name| params.is_present(name)));
    }

    #[test]
    fn test_required_parameters() {
        assert!(required_parameters(AuthMethod::AzureCli).is_empty());
        assert_eq!(required_parameters(AuthMethod::UsernamePassword).len(), 4);
    }

    #[test]
    fn test_parameters_without() {
        let params = parameters_without(AuthMethod::ClientSecret, ParamName::ClientSecret);
        assert_eq!(params.len(), 2);
        assert!(!params.is_present(ParamName::ClientSecret));
    }
}
