use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{describe_call, take_arg, Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::string("message").dynamic()];

inventory::submit! {
    FunctionRegistration {
        name: "throw",
        params: PARAMS,
        ctor: new_throw_function,
    }
}

/// Always fails, carrying its message as the failure payload
pub struct ThrowFunction {
    message: Arg,
}

pub fn new_throw_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(ThrowFunction {
        message: take_arg("throw", &mut args)?,
    }))
}

impl Function for ThrowFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let message = self.message.resolve(ctx)?;
        Err(Error::Thrown(message.to_raw_string()))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        self.message.query_targets(ctx)
    }

    fn description(&self) -> String {
        describe_call("throw", std::slice::from_ref(&self.message))
    }
}
