//! # kusto-testing
//!
//! Test infrastructure for Kusto credential resolution.
//!
//! This crate provides an in-memory identity backend, parameter fixtures, and
//! a tracing capture layer, so resolver behaviour and its diagnostics can be
//! tested without an Azure tenant.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use kusto_auth::CredentialResolver;
//! use kusto_testing::{MockBackend, fixtures};
//!
//! let backend = Arc::new(MockBackend::new());
//! let resolver = CredentialResolver::new(Arc::clone(&backend));
//! resolver.resolve(Some("client-secret"), &fixtures::complete_parameters())?;
//! assert_eq!(backend.request_count(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod fixtures;
pub mod log_capture;
pub mod mock_backend;

pub use log_capture::{CapturedEvent, LogCapture};
pub use mock_backend::{DEVICE_CODE_MESSAGE, MockBackend, PromptRecorder, StaticCredential};
