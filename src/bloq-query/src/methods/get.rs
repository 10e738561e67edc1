use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use super::{describe_method, method_targets};
use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::{MethodRegistration, Param};
use crate::target::{split_path, TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::string("path")];

inventory::submit! {
    MethodRegistration {
        name: "get",
        params: PARAMS,
        ctor: new_get_method,
    }
}

/// Projects a dotted path out of the receiver's value
///
/// Missing keys yield `null`; descending into a scalar is a type mismatch.
pub struct GetMethod {
    receiver: FunctionRef,
    path: Vec<String>,
}

pub fn new_get_method(receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    let path = match args.into_iter().next() {
        Some(Arg::Value(Value::String(p))) => split_path(&p),
        _ => {
            return Err(Error::invalid_arguments(
                "get",
                "expected a literal string path",
            ))
        }
    };
    Ok(Arc::new(GetMethod { receiver, path }))
}

impl Function for GetMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        self.receiver.exec(ctx)?.field_path(&self.path)
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        method_targets(&self.receiver, ctx, &[])
    }

    fn description(&self) -> String {
        describe_method(
            &self.receiver,
            "get",
            &[Arg::from(self.path.join("."))],
        )
    }
}
