use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{split_path, TargetPath, TargetType, TargetsContext};

const PARAMS: &[Param] = &[Param::string("path").optional()];

inventory::submit! {
    FunctionRegistration {
        name: "json",
        params: PARAMS,
        ctor: new_json_function,
    }
}

/// Reads a dotted path out of the JSON body of the current record
pub struct JsonFunction {
    path: Vec<String>,
}

pub fn new_json_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let path = match args.first() {
        Some(Arg::Value(Value::String(p))) => split_path(p),
        Some(other) => {
            return Err(Error::invalid_arguments(
                "json",
                format!("expected a literal string path, found {}", other.describe()),
            ))
        }
        None => Vec::new(),
    };
    Ok(Arc::new(JsonFunction { path }))
}

/// Parse the body of the current record
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn current_body(ctx: &FunctionContext) -> Result<Value> {
    let part = ctx.current_part().ok_or_else(|| Error::IndexOutOfBounds {
        index: ctx.index() as i64,
        len: ctx.batch().len(),
    })?;
    part.json()
}

impl Function for JsonFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let body = current_body(ctx)?;
        body.lookup_path(&self.path).cloned()
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (
            ctx,
            vec![TargetPath::new(TargetType::Value, self.path.iter().cloned())],
        )
    }

    fn description(&self) -> String {
        format!("json(\"{}\")", self.path.join("."))
    }
}
