//! Batch execution engine
//!
//! Runs one compiled function over every record of a message batch, applying
//! the configured error mode to per-record failures and optionally keeping
//! execution statistics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bloq_shared::{MessageBatch, Result, Value};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::context::{FunctionContext, NamedMaps, Variables};
use crate::function::Function;

/// Error handling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Stop execution on first error
    #[default]
    Strict,

    /// Continue execution, collect errors
    Collect,

    /// Ignore errors, return null for failed records
    Ignore,
}

/// Execution configuration options
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Error handling mode
    pub error_mode: ErrorMode,
    /// Whether to collect execution statistics
    pub collect_stats: bool,
    /// Variables available during execution
    pub variables: Variables,
}

/// Result of running a function over a batch
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// One output per record, `null` where a failure was collected or ignored
    pub values: Vec<Value>,
    /// Execution statistics (if collected)
    pub stats: Option<ExecutionStats>,
    /// Failures collected in `Collect` mode
    pub warnings: Vec<String>,
}

/// Execution statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionStats {
    /// Total execution time
    pub execution_time: Duration,
    /// Number of records evaluated
    pub records_processed: usize,
    /// Number of records whose evaluation failed
    pub failures: usize,
}

/// Runs a function over every record of a batch
pub struct BatchExecutor {
    config: ExecutorConfig,
    vars: Arc<Variables>,
    maps: Arc<NamedMaps>,
}

impl BatchExecutor {
    /// Create a new executor with default configuration
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create a new executor with custom configuration
    pub fn with_config(config: ExecutorConfig) -> Self {
        let vars = Arc::new(config.variables.clone());
        Self {
            config,
            vars,
            maps: Arc::default(),
        }
    }

    /// Make named maps available to `apply`
    #[must_use]
    pub fn with_maps(mut self, maps: Arc<NamedMaps>) -> Self {
        self.maps = maps;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute `function` once per record of `batch`
    ///
    /// In `Strict` mode the first failure is returned. Otherwise failed
    /// records produce `null`, and in `Collect` mode the failure message is
    /// kept as a warning.
    pub fn execute_batch(
        &self,
        function: &dyn Function,
        batch: Arc<MessageBatch>,
    ) -> Result<ExecutionResult> {
        let start_time = Instant::now();
        let base = FunctionContext::new(Arc::clone(&batch))
            .with_vars(Arc::clone(&self.vars))
            .with_maps(Arc::clone(&self.maps));

        let mut values = Vec::with_capacity(batch.len());
        let mut warnings = Vec::new();
        let mut failures = 0;

        for index in 0..batch.len() {
            match function.exec(&base.with_index(index)) {
                Ok(value) => values.push(value),
                Err(e) => {
                    failures += 1;
                    match self.config.error_mode {
                        ErrorMode::Strict => return Err(e),
                        ErrorMode::Collect => {
                            warn!("record {} failed: {}", index, e);
                            warnings.push(format!("record {}: {}", index, e));
                            values.push(Value::Null);
                        }
                        ErrorMode::Ignore => values.push(Value::Null),
                    }
                }
            }
        }

        debug!(
            "executed {} over {} records, {} failed",
            function.description(),
            batch.len(),
            failures
        );

        let stats = self.config.collect_stats.then(|| ExecutionStats {
            execution_time: start_time.elapsed(),
            records_processed: batch.len(),
            failures,
        });

        Ok(ExecutionResult {
            values,
            stats,
            warnings,
        })
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}
