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
        name: "or",
        params: PARAMS,
        ctor: new_or_method,
    }
}

/// Like `catch`, but a `null` result is replaced as well
pub struct OrMethod {
    receiver: FunctionRef,
    fallback: Arg,
}

pub fn new_or_method(receiver: FunctionRef, args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(OrMethod {
        receiver,
        fallback: take_arg("or", &mut args)?,
    }))
}

impl Function for OrMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        match self.receiver.exec(ctx) {
            Ok(v) if !v.is_null() => Ok(v),
            Ok(_) => self.fallback.resolve(ctx),
            Err(e) => {
                trace!("or recovered from: {}", e);
                self.fallback.resolve(ctx)
            }
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        method_targets(&self.receiver, ctx, std::slice::from_ref(&self.fallback))
    }

    fn description(&self) -> String {
        describe_method(&self.receiver, "or", std::slice::from_ref(&self.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::literal::new_literal_function;
    use crate::registry::init_function;

    #[test]
    fn test_or_replaces_null_and_failure() {
        let ctx = FunctionContext::default();

        let null = new_or_method(new_literal_function(Value::Null), vec![Arg::from("x")]).unwrap();
        assert_eq!(null.exec(&ctx).unwrap(), Value::string("x"));

        let thrown = init_function("throw", vec![Arg::from("foo")]).unwrap();
        let failed = new_or_method(thrown, vec![Arg::from("x")]).unwrap();
        assert_eq!(failed.exec(&ctx).unwrap(), Value::string("x"));

        let value = new_or_method(new_literal_function(Value::Bool(false)), vec![Arg::from("x")])
            .unwrap();
        assert_eq!(value.exec(&ctx).unwrap(), Value::Bool(false));
    }
}
