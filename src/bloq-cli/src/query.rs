//! Serialized query trees
//!
//! bloq has no expression syntax; a query is written as a tree of registered
//! function and method names with their arguments. For example:
//!
//! ```toml
//! [query]
//! function = "var"
//! args = ["name"]
//! methods = [{ name = "uppercase" }]
//! ```
//!
//! Arguments are JSON-like literals, or `{ query = { ... } }` for a nested
//! query evaluated per call.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use bloq_query::{
    new_field_function, new_literal_function, Arg, Error, FunctionRef, FunctionRegistry,
    NamedMaps, Result, Value,
};
use serde::{Deserialize, Serialize};

/// A query file: the main query plus named maps usable by `apply`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDocument {
    /// Query executed per record
    pub query: QuerySpec,
    /// Named maps
    #[serde(default)]
    pub maps: HashMap<String, QuerySpec>,
}

/// One node of a query tree
///
/// Exactly one of `function`, `field` and `literal` must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySpec {
    /// Registered function name
    pub function: Option<String>,
    /// Dotted path into the bound value or record body
    pub field: Option<String>,
    /// Constant value
    pub literal: Option<serde_json::Value>,
    /// Function arguments
    pub args: Vec<ArgSpec>,
    /// Methods applied in order to the result
    pub methods: Vec<MethodSpec>,
}

/// A constructor argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgSpec {
    /// Nested query evaluated per call
    Query {
        /// The nested query
        query: Box<QuerySpec>,
    },
    /// Literal value
    Literal(serde_json::Value),
}

/// A method applied to the preceding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodSpec {
    /// Registered method name
    pub name: String,
    /// Method arguments
    #[serde(default)]
    pub args: Vec<ArgSpec>,
}

impl QueryDocument {
    /// Load a query document from a TOML or JSON file
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read query file {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let doc = match extension {
            "toml" => toml::from_str(&content)
                .with_context(|| format!("invalid TOML query {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("invalid JSON query {}", path.display()))?,
            other => bail!("unsupported query file format '{}'", other),
        };
        Ok(doc)
    }

    /// Build the main query and every named map
    pub fn build(&self, registry: &FunctionRegistry) -> Result<(FunctionRef, Arc<NamedMaps>)> {
        let query = self.query.build(registry)?;
        let maps = self
            .maps
            .iter()
            .map(|(name, spec)| -> Result<(String, FunctionRef)> {
                Ok((name.clone(), spec.build(registry)?))
            })
            .collect::<Result<NamedMaps>>()?;
        Ok((query, Arc::new(maps)))
    }
}

impl QuerySpec {
    /// Resolve names through the registry and assemble the function tree
    pub fn build(&self, registry: &FunctionRegistry) -> Result<FunctionRef> {
        let mut function = match (&self.function, &self.field, &self.literal) {
            (Some(name), None, None) => registry.init_function(name, build_args(&self.args, registry)?)?,
            (None, Some(path), None) if self.args.is_empty() => new_field_function(path),
            (None, None, Some(value)) if self.args.is_empty() => {
                new_literal_function(Value::from_json(value.clone()))
            }
            _ => {
                return Err(Error::invalid_arguments(
                    "query",
                    "expected exactly one of function, field or literal, with args only for functions",
                ))
            }
        };

        for method in &self.methods {
            function = registry.init_method(&method.name, function, build_args(&method.args, registry)?)?;
        }
        Ok(function)
    }
}

fn build_args(args: &[ArgSpec], registry: &FunctionRegistry) -> Result<Vec<Arg>> {
    args.iter()
        .map(|arg| match arg {
            ArgSpec::Query { query } => Ok(Arg::Function(query.build(registry)?)),
            ArgSpec::Literal(value) => Ok(Arg::Value(Value::from_json(value.clone()))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloq_query::{FunctionContext, TargetPath, TargetType, TargetsContext, Variables};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const TOML_QUERY: &str = r#"
[query]
function = "var"
args = [{ query = { function = "meta", args = ["which"] } }]
methods = [
    { name = "catch", args = ["missing"] },
    { name = "apply", args = ["shout"] },
]

[maps.shout]
field = ""
methods = [{ name = "uppercase" }]
"#;

    #[test]
    fn test_parse_toml_document() {
        let doc: QueryDocument = toml::from_str(TOML_QUERY).unwrap();
        assert_eq!(doc.query.function.as_deref(), Some("var"));
        assert_eq!(doc.query.methods.len(), 2);
        assert!(matches!(doc.query.args[0], ArgSpec::Query { .. }));
        assert!(doc.maps.contains_key("shout"));
    }

    #[test]
    fn test_build_and_run() {
        let doc: QueryDocument = toml::from_str(TOML_QUERY).unwrap();
        let registry = FunctionRegistry::new();
        let (query, maps) = doc.build(&registry).unwrap();

        let batch: bloq_query::MessageBatch =
            vec![bloq_query::Part::new("").with_metadata("which", "who")].into();
        let mut vars = Variables::new();
        vars.insert("who".to_string(), Value::string("alice"));
        let ctx = FunctionContext::new(Arc::new(batch))
            .with_vars(Arc::new(vars))
            .with_maps(Arc::clone(&maps));
        assert_eq!(query.exec(&ctx).unwrap(), Value::string("ALICE"));

        // Without the variable the catch fallback flows into the map
        let ctx = FunctionContext::default().with_maps(maps);
        assert_eq!(query.exec(&ctx).unwrap(), Value::string("MISSING"));
    }

    #[test]
    fn test_build_json_literal_args() {
        let spec: QuerySpec = serde_json::from_str(
            r#"{"literal": {"a": [1, 2]}, "methods": [{"name": "get", "args": ["a.1"]}]}"#,
        )
        .unwrap();
        let f = spec.build(&FunctionRegistry::new()).unwrap();
        assert_eq!(f.exec(&FunctionContext::default()).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_build_rejects_ambiguous_root() {
        let spec = QuerySpec {
            function: Some("var".to_string()),
            field: Some("a".to_string()),
            ..QuerySpec::default()
        };
        let err = spec.build(&FunctionRegistry::new()).unwrap_err();
        assert!(err.is_construction());
        assert!(QuerySpec::default().build(&FunctionRegistry::new()).is_err());
    }

    #[test]
    fn test_build_unknown_names() {
        let spec: QuerySpec = serde_json::from_str(r#"{"function": "nope"}"#).unwrap();
        assert_eq!(
            spec.build(&FunctionRegistry::new()).unwrap_err(),
            Error::UnknownFunction("nope".to_string())
        );
    }

    #[test]
    fn test_load_from_file_and_targets() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"query": {"function": "json", "args": ["a.b"]}}"#)
            .unwrap();
        let doc = QueryDocument::load_from_file(file.path()).unwrap();
        let (query, maps) = doc.build(&FunctionRegistry::new()).unwrap();

        let (_, targets) = query.query_targets(TargetsContext::new().with_maps(maps));
        assert_eq!(targets, vec![TargetPath::new(TargetType::Value, ["a", "b"])]);
    }
}
