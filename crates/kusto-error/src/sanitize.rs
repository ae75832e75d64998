//! Sanitization of error messages before they leave the process.
//!
//! Every message shown to a user goes through two stages:
//!
//! 1. **Redaction**: URLs, bearer tokens, and `password`/`key`/`secret`
//!    assignments are replaced with placeholders.
//! 2. **Generalization**: if the redacted text still talks about an
//!    authentication or connection failure, it is replaced wholesale by a
//!    fixed sentence that carries none of the original content.
//!
//! Redaction always runs first. Generalization, when it fires, replaces the
//! text instead of adding to it.

use std::error::Error as StdError;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::KustoError;

/// Returned for any message that mentions an authentication failure.
pub const AUTHENTICATION_FAILED_MESSAGE: &str =
    "Authentication failed. Please verify your credentials and permissions.";

/// Returned for any message that mentions a connection failure.
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Connection failed. Please verify the cluster URL and network connectivity.";

/// Used when an error renders to an empty string.
const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

// Patterns are compile-time constants.
#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("sanitization pattern must compile")
}

/// Redaction rules, applied in order.
static REDACTIONS: Lazy<[(Regex, &'static str); 5]> = Lazy::new(|| {
    [
        (compile(r"https?://\S+"), "[URL]"),
        (compile(r"(?i)bearer\s+\S+"), "[TOKEN]"),
        (compile(r"(?i)password[=:]\s*\S+"), "password=[REDACTED]"),
        (compile(r"(?i)key[=:]\s*\S+"), "key=[REDACTED]"),
        (compile(r"(?i)secret[=:]\s*\S+"), "secret=[REDACTED]"),
    ]
});

static AUTHENTICATION_FAILURE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)authentication|unauthorized|forbidden|access denied"));

static CONNECTION_FAILURE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)connection|network|timeout|ECONNREFUSED|ETIMEDOUT"));

/// A message that has been through the sanitization pipeline.
///
/// The only way to obtain one is [`sanitize`] or [`sanitize_message`], so a
/// function that takes a `SanitizedMessage` cannot be handed raw error text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedMessage(String);

impl SanitizedMessage {
    /// The sanitized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the message, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check whether this is one of the two fixed generic sentences.
    #[must_use]
    pub fn is_generalized(&self) -> bool {
        self.0 == AUTHENTICATION_FAILED_MESSAGE || self.0 == CONNECTION_FAILED_MESSAGE
    }
}

impl fmt::Display for SanitizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SanitizedMessage> for String {
    fn from(message: SanitizedMessage) -> Self {
        message.0
    }
}

impl PartialEq<str> for SanitizedMessage {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SanitizedMessage {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Sanitize an error for display outside the process.
///
/// A [`KustoError`] starts from its labeled [`KustoError::format`] string;
/// any other error starts from its `Display` output.
#[must_use]
pub fn sanitize(error: &(dyn StdError + 'static)) -> SanitizedMessage {
    let message = match error.downcast_ref::<KustoError>() {
        Some(kusto) => kusto.format(),
        None => error.to_string(),
    };
    sanitize_message(&message)
}

/// Sanitize a raw message string.
#[must_use]
pub fn sanitize_message(message: &str) -> SanitizedMessage {
    let message = if message.is_empty() {
        UNKNOWN_ERROR_MESSAGE
    } else {
        message
    };

    let redacted = redact(message);

    if AUTHENTICATION_FAILURE.is_match(&redacted) {
        return SanitizedMessage(AUTHENTICATION_FAILED_MESSAGE.to_string());
    }
    if CONNECTION_FAILURE.is_match(&redacted) {
        return SanitizedMessage(CONNECTION_FAILED_MESSAGE.to_string());
    }

    SanitizedMessage(redacted)
}

fn redact(message: &str) -> String {
    REDACTIONS
        .iter()
        .fold(message.to_string(), |working, (pattern, replacement)| {
            pattern.replace_all(&working, *replacement).into_owned()
        })
}

impl KustoError {
    /// Sanitize this error for display outside the process.
    #[must_use]
    pub fn sanitized(&self) -> SanitizedMessage {
        sanitize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_urls() {
        let out = sanitize_message("failed to reach https://mycluster.kusto.windows.net/v1/rest");
        assert_eq!(out, "failed to reach [URL]");
    }

    #[test]
    fn test_redacts_bearer_token_case_insensitive() {
        assert_eq!(
            sanitize_message("header was Bearer abc123"),
            "header was [TOKEN]"
        );
        assert_eq!(
            sanitize_message("header was bEaReR   abc123 end"),
            "header was [TOKEN] end"
        );
    }

    #[test]
    fn test_redacts_password_key_secret() {
        assert_eq!(
            sanitize_message("login with password=hunter2 failed"),
            "login with password=[REDACTED] failed"
        );
        assert_eq!(
            sanitize_message("Password: hunter2"),
            "password=[REDACTED]"
        );
        assert_eq!(sanitize_message("api_key=xyz"), "api_key=[REDACTED]");
        assert_eq!(
            sanitize_message("client_secret: s3cr3t trailing"),
            "client_secret=[REDACTED] trailing"
        );
    }

    #[test]
    fn test_authentication_vocabulary_generalized() {
        for message in [
            "401 Unauthorized for password=hunter2",
            "Forbidden",
            "ACCESS DENIED to database",
            "AADSTS7000215: authentication failed",
        ] {
            assert_eq!(sanitize_message(message), AUTHENTICATION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_connection_vocabulary_generalized() {
        for message in [
            "connect ECONNREFUSED 10.0.0.4:443",
            "ETIMEDOUT",
            "network unreachable",
            "Connection reset by peer",
            "operation timeout",
        ] {
            assert_eq!(sanitize_message(message), CONNECTION_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_authentication_wins_over_connection() {
        assert_eq!(
            sanitize_message("connection closed: unauthorized"),
            AUTHENTICATION_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_redaction_runs_before_classification() {
        // The only auth keyword sits inside the URL, which is redacted first.
        assert_eq!(
            sanitize_message("see https://login.example.com/authentication for help"),
            "see [URL] for help"
        );
    }

    #[test]
    fn test_plain_message_passes_through() {
        assert_eq!(
            sanitize_message("Semantic error: 'Foo' is not a table"),
            "Semantic error: 'Foo' is not a table"
        );
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(sanitize_message(""), "Unknown error");
    }

    #[test]
    fn test_kusto_error_uses_formatted_message() {
        let err = KustoError::query("'Foo' is not a table");
        assert_eq!(
            sanitize(&err),
            "Kusto Query Error: 'Foo' is not a table"
        );

        let err = KustoError::resource_not_found("database Samples");
        assert_eq!(
            err.sanitized(),
            "Kusto Resource Not Found: Resource not found: database Samples"
        );
    }

    #[test]
    fn test_kusto_error_still_redacted() {
        let err = KustoError::query("bad literal near secret=abc");
        assert_eq!(
            sanitize(&err),
            "Kusto Query Error: bad literal near secret=[REDACTED]"
        );
    }

    #[test]
    fn test_kusto_auth_and_connection_errors_generalized() {
        assert_eq!(
            sanitize(&KustoError::authentication("token rejected")),
            AUTHENTICATION_FAILED_MESSAGE
        );
        assert_eq!(
            sanitize(&KustoError::connection("dns failure")),
            CONNECTION_FAILED_MESSAGE
        );
        assert_eq!(
            sanitize(&KustoError::timeout("query ran 10 minutes")),
            CONNECTION_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_foreign_error_uses_display() {
        let err = std::io::Error::other("could not open /tmp/cert.pem with key=abc");
        assert_eq!(
            sanitize(&err),
            "could not open /tmp/cert.pem with key=[REDACTED]"
        );
    }

    #[test]
    fn test_generic_sentences_are_fixed_points() {
        let auth = sanitize_message(AUTHENTICATION_FAILED_MESSAGE);
        let conn = sanitize_message(CONNECTION_FAILED_MESSAGE);
        assert_eq!(auth, AUTHENTICATION_FAILED_MESSAGE);
        assert_eq!(conn, CONNECTION_FAILED_MESSAGE);
        assert!(auth.is_generalized());
        assert!(conn.is_generalized());
    }
}
