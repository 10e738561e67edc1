use bloq_shared::{Result, Value};
use log::trace;
use std::sync::Arc;

use super::{describe_method, method_targets};
use crate::context::FunctionContext;
use crate::function::{take_arg, Arg, Function, FunctionRef};
use crate::registry::{MethodRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::any("fallback").dynamic()];

inventory::submit! {
    MethodRegistration {
        name: "catch",
        params: PARAMS,
        ctor: new_catch_method,
    }
}

/// Recovers from a failed receiver with a fallback
///
/// The fallback is evaluated against the same context the receiver saw.
pub struct CatchMethod {
    receiver: FunctionRef,
    fallback: Arg,
}

pub fn new_catch_method(receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(CatchMethod {
        receiver,
        fallback: take_arg("catch", &mut args)?,
    }))
}

impl Function for CatchMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        match self.receiver.exec(ctx) {
            Ok(v) => Ok(v),
            Err(e) => {
                trace!("catch recovered from: {}", e);
                self.fallback.resolve(ctx)
            }
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        method_targets(&self.receiver, ctx, std::slice::from_ref(&self.fallback))
    }

    fn description(&self) -> String {
        describe_method(&self.receiver, "catch", std::slice::from_ref(&self.fallback))
    }
}
