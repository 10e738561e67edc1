use bloq_shared::{Error, Result, Value};

use crate::context::FunctionContext;
use crate::function::{describe_call, take_arg, Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetType, TargetsContext};
use std::sync::Arc;

const PARAMS: &[Param] = &[Param::string("name").dynamic()];

inventory::submit! {
    FunctionRegistration {
        name: "var",
        params: PARAMS,
        ctor: new_var_function,
    }
}

/// Reads a named variable of the current invocation
pub struct VarFunction {
    name: Arg,
}

pub fn new_var_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let mut args = args.into_iter();
    Ok(Arc::new(VarFunction {
        name: take_arg("var", &mut args)?,
    }))
}

impl Function for VarFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let name = self.name.resolve_string(ctx)?;
        ctx.var(&name)
            .cloned()
            .ok_or(Error::UndefinedVariable(name))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        match &self.name {
            Arg::Value(Value::String(name)) => (
                ctx,
                vec![TargetPath::new(TargetType::Variable, [name.as_str()])],
            ),
            dynamic => dynamic.query_targets(ctx),
        }
    }

    fn description(&self) -> String {
        describe_call("var", std::slice::from_ref(&self.name))
    }
}
