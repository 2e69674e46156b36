//! # Error Handling Framework
//!
//! Structured errors for the pipeline: categorized codes, request/error
//! context for debugging, severity classification, and a metrics collector
//! that counts occurrences by category and severity.
//!
//! ## Error Categories
//!
//! - **Compliance / Extraction / NLP**: domain-specific failures from C1/C4/C6
//! - **Database / Network**: persistence and external-service failures
//! - **Validation / Resource**: input and lookup failures
//! - **Configuration / Internal**: startup and unexpected system errors
//!
//! ## Context Tracking
//!
//! - **Request Context**: populated by the request-id middleware, read by
//!   handlers and the audit logger
//! - **Error Context**: error id, request id, metadata and trace entries
//!   attached as an error propagates up the call stack
//!
//! ## Usage
//!
//! ```rust,ignore
//! use preventia_core::error::{Error, ErrorCode, Result};
//!
//! fn evaluate(source_active: bool) -> Result<()> {
//!     if !source_active {
//!         return Err(Error::new(ErrorCode::SourceInactive, "source is not active"));
//!     }
//!     Ok(())
//! }
//! ```

pub mod codes;
pub mod context;
pub mod framework;
pub mod metrics;

pub use codes::ErrorCode;
pub use context::{ErrorContext, RequestContext};
pub use framework::{Error, ErrorCategory, ErrorSeverity, Result};
pub use metrics::ErrorMetrics;