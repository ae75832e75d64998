#![no_main]

use kusto_auth::{AuthMethod, StrategyRegistry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(identifier) = std::str::from_utf8(data) else {
        return;
    };

    match StrategyRegistry::global().lookup(Some(identifier)) {
        Ok(strategy) => {
            let method = strategy.method();
            let trimmed = identifier.trim();
            assert!(trimmed.is_empty() || trimmed.eq_ignore_ascii_case(method.as_str()));
            assert_eq!(AuthMethod::parse(method.as_str()), Some(method));
        }
        Err(err) => {
            assert!(err.method().is_none());
            assert!(err.to_string().starts_with("Unsupported authentication method: "));
        }
    }
});
