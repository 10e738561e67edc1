use bloq_shared::{Error, Result, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{describe_call, Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetType, TargetsContext};

const PARAMS: &[Param] = &[Param::string("key").optional().dynamic()];

inventory::submit! {
    FunctionRegistration {
        name: "meta",
        params: PARAMS,
        ctor: new_meta_function,
    }
}

/// Reads metadata of the current record
///
/// With a key, returns that metadata value as a string. Without one,
/// returns every metadata pair of the record as an object.
pub struct MetaFunction {
    key: Option<Arg>,
}

pub fn new_meta_function(args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(MetaFunction {
        key: args.into_iter().next(),
    }))
}

impl Function for MetaFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let Some(key) = &self.key else {
            let all: HashMap<String, Value> = ctx
                .current_part()
                .map(|part| {
                    part.metadata_map()
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::string(v.as_str())))
                        .collect()
                })
                .unwrap_or_default();
            return Ok(Value::Object(all));
        };

        let key = key.resolve_string(ctx)?;
        match ctx.current_part().and_then(|part| part.metadata(&key)) {
            Some(v) => Ok(Value::string(v)),
            None => Err(Error::MetadataNotFound(key)),
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        match &self.key {
            None => (
                ctx,
                vec![TargetPath::new(TargetType::Metadata, Vec::<String>::new())],
            ),
            Some(Arg::Value(Value::String(key))) => (
                ctx,
                vec![TargetPath::new(TargetType::Metadata, [key.as_str()])],
            ),
            Some(dynamic) => dynamic.query_targets(ctx),
        }
    }

    fn description(&self) -> String {
        describe_call("meta", self.key.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloq_shared::{MessageBatch, Part};

    fn ctx() -> FunctionContext {
        let batch: MessageBatch = vec![
            Part::new("").with_metadata("foo", "foobar"),
            Part::new("").with_metadata("foo", "second").with_metadata("bar", "baz"),
        ]
        .into();
        FunctionContext::new(Arc::new(batch))
    }

    #[test]
    fn test_meta_found() {
        let f = new_meta_function(vec![Arg::from("foo")]).unwrap();
        assert_eq!(f.exec(&ctx()).unwrap(), Value::string("foobar"));
        assert_eq!(f.exec(&ctx().with_index(1)).unwrap(), Value::string("second"));
    }

    #[test]
    fn test_meta_not_found() {
        let f = new_meta_function(vec![Arg::from("foo")]).unwrap();
        let err = f.exec(&FunctionContext::default()).unwrap_err();
        assert_eq!(err.to_string(), "metadata value 'foo' not found");

        let f = new_meta_function(vec![Arg::from("nope")]).unwrap();
        assert!(f.exec(&ctx()).is_err());
    }

    #[test]
    fn test_meta_all() {
        let f = new_meta_function(vec![]).unwrap();
        let result = f.exec(&ctx().with_index(1)).unwrap();
        assert_eq!(result.field("bar").unwrap(), Value::string("baz"));
        assert_eq!(result.len(), Some(2));

        let empty = f.exec(&FunctionContext::default()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_meta_targets() {
        let f = new_meta_function(vec![Arg::from("foo")]).unwrap();
        let (_, targets) = f.query_targets(TargetsContext::new());
        assert_eq!(targets, vec![TargetPath::new(TargetType::Metadata, ["foo"])]);

        let all = new_meta_function(vec![]).unwrap();
        let (_, targets) = all.query_targets(TargetsContext::new());
        assert_eq!(targets.len(), 1);
        assert!(targets[0].path.is_empty());
    }
}
