#![no_main]

use kusto_error::{AUTHENTICATION_FAILED_MESSAGE, CONNECTION_FAILED_MESSAGE, sanitize_message};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(message) = std::str::from_utf8(data) else {
        return;
    };

    let once = sanitize_message(message);
    assert!(!once.as_str().is_empty());

    // Sanitizing twice must not change anything
    let twice = sanitize_message(once.as_str());
    assert_eq!(once, twice);

    if once.is_generalized() {
        assert!(
            once == AUTHENTICATION_FAILED_MESSAGE || once == CONNECTION_FAILED_MESSAGE,
            "unexpected generalized message: {once}"
        );
    }
});
