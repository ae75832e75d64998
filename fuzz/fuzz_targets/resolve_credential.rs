#![no_main]

use arbitrary::Arbitrary;
use kusto_auth::{AuthMethod, CredentialResolver, ParamName, ParameterSet};
use kusto_error::{ErrorKind, KustoError};
use kusto_testing::MockBackend;
use libfuzzer_sys::fuzz_target;

/// Arbitrary resolver input.
#[derive(Debug, Arbitrary)]
struct FuzzResolveInput {
    /// Index into the known methods, or an arbitrary identifier
    method: Result<u8, String>,
    /// Parameter values, in `ParamName::ALL` order
    values: [Option<String>; 7],
}

fuzz_target!(|input: FuzzResolveInput| {
    let identifier = match &input.method {
        Ok(index) => AuthMethod::ALL[usize::from(*index) % AuthMethod::ALL.len()]
            .as_str()
            .to_string(),
        Err(raw) => raw.clone(),
    };

    let params: ParameterSet = ParamName::ALL
        .into_iter()
        .zip(input.values)
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();

    let resolver = CredentialResolver::new(MockBackend::new());
    match resolver.resolve(Some(identifier.as_str()), &params) {
        Ok(_) => {
            assert_eq!(resolver.backend().request_count(), 1);
        }
        Err(err) => {
            assert_eq!(resolver.backend().request_count(), 0);
            let err = KustoError::from(err);
            assert_eq!(err.kind(), ErrorKind::Authentication);
        }
    }
});
