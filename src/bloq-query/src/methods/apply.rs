use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use super::{describe_method, method_targets};
use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::{MethodRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::string("name")];

inventory::submit! {
    MethodRegistration {
        name: "apply",
        params: PARAMS,
        ctor: new_apply_method,
    }
}

/// Executes a named map with the receiver's result as the bound value
pub struct ApplyMethod {
    receiver: FunctionRef,
    name: String,
}

pub fn new_apply_method(receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    let name = match args.into_iter().next() {
        Some(Arg::Value(Value::String(name))) => name,
        _ => {
            return Err(Error::invalid_arguments(
                "apply",
                "expected a literal map name",
            ))
        }
    };
    Ok(Arc::new(ApplyMethod { receiver, name }))
}

impl Function for ApplyMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let value = self.receiver.exec(ctx)?;
        let map = ctx
            .map(&self.name)
            .ok_or_else(|| Error::MapNotFound(self.name.clone()))?;
        map.exec(&ctx.with_value(value))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        let (ctx, mut paths) = method_targets(&self.receiver, ctx, &[]);
        // A map reached again through its own body adds nothing new
        if ctx.is_expanding(&self.name) {
            return (ctx, paths);
        }
        let Some(map) = ctx.maps().get(&self.name).cloned() else {
            return (ctx, paths);
        };
        let (_, mut from_map) = map.query_targets(ctx.entering(&self.name));
        paths.append(&mut from_map);
        (ctx, paths)
    }

    fn description(&self) -> String {
        describe_method(&self.receiver, "apply", &[Arg::from(self.name.as_str())])
    }
}
