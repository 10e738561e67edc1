use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{describe_call, take_arg, Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::string("name").dynamic()];

inventory::submit! {
    FunctionRegistration {
        name: "env",
        params: PARAMS,
        ctor: new_env_function,
    }
}

/// Reads a process environment variable at call time
pub struct EnvFunction {
    name: Arg,
}

pub fn new_env_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(EnvFunction {
        name: take_arg("env", &mut args)?,
    }))
}

impl Function for EnvFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let name = self.name.resolve_string(ctx)?;
        match std::env::var(&name) {
            Ok(v) => Ok(Value::String(v)),
            Err(_) => Err(Error::EnvNotFound(name)),
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        self.name.query_targets(ctx)
    }

    fn description(&self) -> String {
        describe_call("env", std::slice::from_ref(&self.name))
    }
}
