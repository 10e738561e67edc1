//! bloq-shared: Shared types for bloq crates
//!
//! This crate contains the types every other bloq crate speaks in: the
//! dynamically typed [`Value`](value::Value), the message batch a query is
//! evaluated against, and the error taxonomy used by the query runtime.
//!
//! # Features
//!
//! - **Common Result Type**: `Result<T>` over the typed [`Error`]
//! - **Values**: JSON-like tagged values with projection helpers
//! - **Messages**: batches of parts carrying a raw body and string metadata

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown,
    clippy::uninlined_format_args
)]

/// Error taxonomy for construction and execution of queries
pub mod error;

/// Message batch types
pub mod message;

/// Core value types for query evaluation
pub mod value;

pub use error::Error;
pub use message::{MessageBatch, Part};
pub use value::Value;

/// Result type alias for bloq operations
pub type Result<T> = std::result::Result<T, Error>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
