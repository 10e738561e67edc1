//! bloq-cli library
//!
//! Provides the argument parser, configuration and query loader behind the
//! `bloq` binary.

pub mod cli;
pub mod config;
pub mod query;
pub mod runner;

pub use config::Config;
pub use query::{QueryDocument, QuerySpec};
pub use runner::Runner;
