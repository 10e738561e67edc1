use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use super::{describe_method, method_targets};
use crate::context::FunctionContext;
use crate::function::{take_arg, Arg, Function, FunctionRef};
use crate::registry::{MethodRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::int("index").dynamic()];

inventory::submit! {
    MethodRegistration {
        name: "from",
        params: PARAMS,
        ctor: new_from_method,
    }
}

/// Evaluates the receiver against another record of the batch
///
/// Negative indexes count back from the end of the batch.
pub struct FromMethod {
    receiver: FunctionRef,
    index: Arg,
}

pub fn new_from_method(receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(FromMethod {
        receiver,
        index: take_arg("from", &mut args)?,
    }))
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let resolved = if index < 0 { len as i64 + index } else { index };
    if resolved < 0 || resolved >= len as i64 {
        return Err(Error::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

impl Function for FromMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let index = match self.index.resolve(ctx)? {
            Value::Int(i) => i,
            other => return Err(Error::type_mismatch("integer", &other)),
        };
        let index = resolve_index(index, ctx.batch().len())?;
        self.receiver.exec(&ctx.with_index(index))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        method_targets(&self.receiver, ctx, std::slice::from_ref(&self.index))
    }

    fn description(&self) -> String {
        describe_method(&self.receiver, "from", std::slice::from_ref(&self.index))
    }
}
