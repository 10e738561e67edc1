use bloq_shared::{Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Function, FunctionRef};
use crate::target::{TargetPath, TargetsContext};

/// Returns a fixed value
pub struct LiteralFunction {
    value: Value,
}

/// Wrap a literal so it can stand wherever a function is expected
pub fn new_literal_function(value: Value) -> FunctionRef {
    Arc::new(LiteralFunction { value })
}

impl Function for LiteralFunction {
    fn exec(&self, _ctx: &FunctionContext) -> Result<Value> {
        Ok(self.value.clone())
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        format!("literal: {}", self.value)
    }
}
