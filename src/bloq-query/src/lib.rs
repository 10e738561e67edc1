//! # bloq-query
//!
//! The query function runtime for bloq.
//!
//! A query is a tree of [`Function`] values. Trees are assembled by name
//! through the registry ([`init_function`], [`init_method`]), then executed
//! once per record with [`Function::exec`] and analysed ahead of time with
//! [`Function::query_targets`].
//!
//! This crate provides:
//! - The per-call [`FunctionContext`] and the static [`TargetsContext`]
//! - The [`Function`] trait and constructor arguments ([`Arg`])
//! - An inventory-backed [`FunctionRegistry`] of functions and methods
//! - The built-in catalog (`var`, `meta`, `json`, `env`, `throw`,
//!   `random_int`, timestamps, ...) and methods (`catch`, `get`, ...)
//! - A [`BatchExecutor`] that runs a query over every record of a batch

#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args,
    clippy::needless_pass_by_value
)]

pub mod builtin;
pub mod context;
pub mod executor;
pub mod function;
pub mod methods;
pub mod random;
pub mod registry;
pub mod target;

// Re-export inventory for use by builtin modules
pub use inventory;

pub use builtin::field::new_field_function;
pub use builtin::literal::new_literal_function;
pub use context::{FunctionContext, NamedMaps, Variables};
pub use executor::{BatchExecutor, ErrorMode, ExecutionResult, ExecutionStats, ExecutorConfig};
pub use function::{Arg, Function, FunctionRef};
pub use registry::{
    init_function, init_method, FunctionRegistration, FunctionRegistry, MethodRegistration,
    Param, ParamKind,
};
pub use target::{TargetPath, TargetType, TargetsContext};

/// Re-export commonly used types from bloq-shared
pub use bloq_shared::{Error, MessageBatch, Part, Result, Value};
