//! # bloq
//!
//! A query function runtime for stream-processing pipelines.
//!
//! Queries are trees of composable functions built by name from a registry,
//! executed once per record against a [`FunctionContext`], and analysed
//! ahead of time for what they read via [`Function::query_targets`].
//!
//! ```
//! use std::sync::Arc;
//! use bloq::{init_function, init_method, Arg, FunctionContext, MessageBatch, Part, Value};
//!
//! let query = init_method(
//!     "catch",
//!     init_function("meta", vec![Arg::from("topic")]).unwrap(),
//!     vec![Arg::from("unknown")],
//! )
//! .unwrap();
//!
//! let batch: MessageBatch = vec![Part::new("{}").with_metadata("topic", "orders")].into();
//! let ctx = FunctionContext::new(Arc::new(batch));
//! assert_eq!(query.exec(&ctx).unwrap(), Value::string("orders"));
//! assert_eq!(query.exec(&FunctionContext::default()).unwrap(), Value::string("unknown"));
//! ```

pub use bloq_query::*;

/// Shared value, message and error types
pub use bloq_shared as shared;
