//! Execution context for query functions
//!
//! A [`FunctionContext`] bundles everything a function may read during one
//! call: the message batch, the index of the current record, named
//! variables, named maps and an optional bound value. Contexts are cheap to
//! clone (every field is reference counted) and are never mutated by a
//! function; nested evaluations derive a new context instead.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bloq_shared::{MessageBatch, Part, Value};

use crate::function::FunctionRef;

/// Variables scoped to one pipeline invocation
pub type Variables = HashMap<String, Value>;

/// Named function sub-trees that can be applied by name
pub type NamedMaps = HashMap<String, FunctionRef>;

/// Per-call execution context
#[derive(Clone, Default)]
pub struct FunctionContext {
    batch: Arc<MessageBatch>,
    index: usize,
    vars: Arc<Variables>,
    maps: Arc<NamedMaps>,
    value: Option<Arc<Value>>,
}

impl FunctionContext {
    /// Create a context over a batch, pointing at its first record
    pub fn new(batch: Arc<MessageBatch>) -> Self {
        Self {
            batch,
            ..Self::default()
        }
    }

    /// Replace the variables
    #[must_use]
    pub fn with_vars(mut self, vars: Arc<Variables>) -> Self {
        self.vars = vars;
        self
    }

    /// Replace the named maps
    #[must_use]
    pub fn with_maps(mut self, maps: Arc<NamedMaps>) -> Self {
        self.maps = maps;
        self
    }

    /// Derive a context pointing at another record of the same batch
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    /// Derive a context with the bound value replaced
    #[must_use]
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        Self {
            value: Some(Arc::new(value.into())),
            ..self.clone()
        }
    }

    /// The batch being evaluated
    pub fn batch(&self) -> &MessageBatch {
        &self.batch
    }

    /// Index of the current record
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current record, if the index addresses one
    pub fn current_part(&self) -> Option<&Part> {
        self.batch.get(self.index)
    }

    /// All variables
    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    /// Look up a variable
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Look up a named map
    pub fn map(&self, name: &str) -> Option<&FunctionRef> {
        self.maps.get(name)
    }

    /// Shared handle on the named maps
    pub fn maps(&self) -> &Arc<NamedMaps> {
        &self.maps
    }

    /// The bound value, if any
    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }
}

impl fmt::Debug for FunctionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionContext")
            .field("batch_len", &self.batch.len())
            .field("index", &self.index)
            .field("vars", &self.vars.len())
            .field("maps", &self.maps.len())
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_empty() {
        let ctx = FunctionContext::default();
        assert_eq!(ctx.index(), 0);
        assert!(ctx.batch().is_empty());
        assert!(ctx.current_part().is_none());
        assert!(ctx.value().is_none());
        assert!(ctx.var("foo").is_none());
    }

    #[test]
    fn test_with_value_derives() {
        let ctx = FunctionContext::default();
        let derived = ctx.with_value(5);
        assert_eq!(derived.value(), Some(&Value::Int(5)));
        assert!(ctx.value().is_none());

        let nested = derived.with_value("x");
        assert_eq!(nested.value(), Some(&Value::string("x")));
        assert_eq!(derived.value(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_with_index_keeps_batch() {
        let batch: MessageBatch = vec![Part::new("a"), Part::new("b")].into();
        let ctx = FunctionContext::new(Arc::new(batch));
        let second = ctx.with_index(1);
        assert_eq!(second.current_part().map(Part::body), Some(&b"b"[..]));
        assert_eq!(ctx.index(), 0);
    }

    #[test]
    fn test_vars() {
        let vars: Variables = [("foo".to_string(), Value::string("bar"))].into();
        let ctx = FunctionContext::default().with_vars(Arc::new(vars));
        assert_eq!(ctx.var("foo"), Some(&Value::string("bar")));
        assert_eq!(ctx.vars().len(), 1);
    }
}
