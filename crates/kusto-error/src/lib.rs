//! # kusto-error
//!
//! Error taxonomy and message sanitization shared by the Kusto crates.
//!
//! Every error produced by this workspace is a [`KustoError`] tagged with one
//! of a closed set of [`ErrorKind`]s. Before an error is shown to anyone other
//! than an operator (tool responses, UI, user-facing logs) it must go through
//! [`sanitize`], which strips secrets and generalizes authentication and
//! connection failures.
//!
//! ## Error Kinds
//!
//! | Kind | Message prefix | Display label |
//! |------|----------------|---------------|
//! | Connection | `Connection error: ` | Kusto Connection Error |
//! | Authentication | `Authentication error: ` | Kusto Authentication Error |
//! | Query | - | Kusto Query Error |
//! | ResourceNotFound | `Resource not found: ` | Kusto Resource Not Found |
//! | Validation | `Validation error: ` | Kusto Validation Error |
//! | DataConversion | `Data conversion error: ` | Kusto Data Conversion Error |
//! | Timeout | `Timeout error: ` | Kusto Timeout Error |
//! | Generic | - | Kusto Error |
//!
//! ## Example
//!
//! ```rust
//! use kusto_error::{KustoError, sanitize, sanitize_message};
//!
//! let err = KustoError::query("syntax error near 'whre'");
//! assert_eq!(err.format(), "Kusto Query Error: syntax error near 'whre'");
//!
//! let safe = sanitize_message("request failed with Bearer eyJ0eXAi");
//! assert_eq!(safe.as_str(), "request failed with [TOKEN]");
//!
//! let safe = sanitize(&KustoError::authentication("token rejected"));
//! assert_eq!(
//!     safe.as_str(),
//!     "Authentication failed. Please verify your credentials and permissions."
//! );
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod sanitize;

pub use error::{ErrorKind, KustoError, Result, is_kusto_error};
pub use sanitize::{
    AUTHENTICATION_FAILED_MESSAGE, CONNECTION_FAILED_MESSAGE, SanitizedMessage, sanitize,
    sanitize_message,
};
