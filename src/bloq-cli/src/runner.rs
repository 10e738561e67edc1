//! Runs a query document over newline-delimited records

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use bloq_query::{BatchExecutor, ExecutionStats, FunctionRegistry, MessageBatch, Part};
use log::{debug, info};

use crate::config::Config;
use crate::query::QueryDocument;

/// Executes queries with a fixed configuration
pub struct Runner {
    config: Config,
    registry: FunctionRegistry,
}

impl Runner {
    /// Create a runner over the default function registry
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: FunctionRegistry::new(),
        }
    }

    /// Write every registered function and method name
    pub fn list_functions<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "functions:")?;
        for name in self.registry.function_names() {
            writeln!(out, "  {}", name)?;
        }
        writeln!(out, "methods:")?;
        for name in self.registry.method_names() {
            writeln!(out, "  {}", name)?;
        }
        Ok(())
    }

    /// Write the target paths of a query, one per line
    pub fn print_targets<W: Write>(&self, doc: &QueryDocument, out: &mut W) -> Result<()> {
        let (query, maps) = doc.build(&self.registry).context("failed to build query")?;
        let (_, targets) = query.query_targets(bloq_query::TargetsContext::new().with_maps(maps));
        for target in targets {
            writeln!(out, "{:?} {}", target.target_type, target.path.join("."))?;
        }
        Ok(())
    }

    /// Execute a query over every non-empty input line, writing one JSON
    /// result per record
    pub fn run<R: BufRead, W: Write>(
        &self,
        doc: &QueryDocument,
        input: R,
        out: &mut W,
    ) -> Result<Option<ExecutionStats>> {
        let (query, maps) = doc.build(&self.registry).context("failed to build query")?;
        debug!("built query {}", query.description());

        let mut batch = MessageBatch::new();
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            if line.trim().is_empty() {
                continue;
            }
            batch.push(Part::new(line));
        }
        info!("read {} records", batch.len());

        let executor = BatchExecutor::with_config(self.config.executor_config()).with_maps(maps);
        let result = executor
            .execute_batch(query.as_ref(), Arc::new(batch))
            .context("query execution failed")?;

        for value in &result.values {
            writeln!(out, "{}", serde_json::to_string(value)?)?;
        }
        Ok(result.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloq_query::ErrorMode;
    use pretty_assertions::assert_eq;

    fn doc(json: &str) -> QueryDocument {
        serde_json::from_str(json).unwrap()
    }

    fn run(config: Config, doc: &QueryDocument, input: &str) -> Result<String> {
        let mut out = Vec::new();
        Runner::new(config).run(doc, input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_run_records() {
        let doc = doc(r#"{"query": {"function": "json", "args": ["name"], "methods": [{"name": "uppercase"}]}}"#);
        let out = run(
            Config::default(),
            &doc,
            "{\"name\":\"a\"}\n\n{\"name\":\"b\"}\n",
        )
        .unwrap();
        assert_eq!(out, "\"A\"\n\"B\"\n");
    }

    #[test]
    fn test_run_error_modes() {
        let doc = doc(r#"{"query": {"function": "json", "args": ["n"]}}"#);
        let input = "{\"n\":1}\nbad\n";
        assert!(run(Config::default(), &doc, input).is_err());

        let mut config = Config::default();
        config.executor.error_mode = ErrorMode::Collect;
        assert_eq!(run(config, &doc, input).unwrap(), "1\nnull\n");
    }

    #[test]
    fn test_run_with_variables_and_stats() {
        let mut config = Config::default();
        config.executor.collect_stats = true;
        config
            .variables
            .insert("greeting".to_string(), serde_json::json!("hello"));
        let doc = doc(r#"{"query": {"function": "var", "args": ["greeting"]}}"#);

        let mut out = Vec::new();
        let stats = Runner::new(config)
            .run(&doc, "x\ny\n".as_bytes(), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(stats.records_processed, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "\"hello\"\n\"hello\"\n");
    }

    #[test]
    fn test_print_targets() {
        let doc = doc(r#"{"query": {"function": "meta", "args": ["topic"]}}"#);
        let mut out = Vec::new();
        Runner::new(Config::default())
            .print_targets(&doc, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Metadata topic\n");
    }

    #[test]
    fn test_list_functions() {
        let mut out = Vec::new();
        Runner::new(Config::default())
            .list_functions(&mut out)
            .unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("  random_int\n"));
        assert!(listing.contains("  catch\n"));
    }
}
