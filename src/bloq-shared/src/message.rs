//! Message batch types
//!
//! A [`MessageBatch`] is the ordered set of records one pipeline invocation
//! evaluates queries against. Each [`Part`] carries a raw body and a
//! string-keyed metadata map. Parts are read-only from the point of view of
//! a query: the body is parsed on every structured read and never cached or
//! rewritten.

use bytes::Bytes;
use std::collections::HashMap;

use crate::value::Value;

/// A single record of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    body: Bytes,
    metadata: HashMap<String, String>,
}

impl Part {
    /// Create a part from a raw body
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            metadata: HashMap::new(),
        }
    }

    /// Builder-style metadata setter
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Raw body bytes
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Look up a metadata value
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// All metadata of this part
    pub fn metadata_map(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Parse the body as a JSON document
    pub fn json(&self) -> crate::Result<Value> {
        let json: serde_json::Value = serde_json::from_slice(&self.body)?;
        Ok(Value::from_json(json))
    }
}

/// Ordered, indexable sequence of parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBatch {
    parts: Vec<Part>,
}

impl MessageBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part
    pub fn push(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Part at `index`
    pub fn get(&self, index: usize) -> Option<&Part> {
        self.parts.get(index)
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the batch has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate over the parts in order
    pub fn iter(&self) -> std::slice::Iter<'_, Part> {
        self.parts.iter()
    }
}

impl FromIterator<Part> for MessageBatch {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Part>> for MessageBatch {
    fn from(parts: Vec<Part>) -> Self {
        Self { parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_metadata() {
        let part = Part::new("hello")
            .with_metadata("foo", "bar")
            .with_metadata("baz", "qux");
        assert_eq!(part.metadata("foo"), Some("bar"));
        assert_eq!(part.metadata("baz"), Some("qux"));
        assert_eq!(part.metadata("missing"), None);
        assert_eq!(part.metadata_map().len(), 2);
        assert_eq!(part.body(), b"hello");
    }

    #[test]
    fn test_part_json() {
        let part = Part::new(r#"{"a":{"b":1}}"#);
        assert_eq!(
            part.json().unwrap().field_path(&["a", "b"]).unwrap(),
            Value::Int(1)
        );
        assert!(Part::new("not json").json().is_err());
    }

    #[test]
    fn test_batch_indexing() {
        let batch: MessageBatch = vec![Part::new("a"), Part::new("b")].into_iter().collect();
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.get(1).map(Part::body), Some(&b"b"[..]));
        assert!(batch.get(2).is_none());
        assert!(MessageBatch::new().is_empty());
    }
}
