use bloq_shared::{Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::FunctionRegistration;
use crate::target::{TargetPath, TargetsContext};

inventory::submit! {
    FunctionRegistration {
        name: "batch_index",
        params: &[],
        ctor: new_batch_index_function,
    }
}

inventory::submit! {
    FunctionRegistration {
        name: "batch_size",
        params: &[],
        ctor: new_batch_size_function,
    }
}

#[derive(Clone, Copy)]
enum Field {
    Index,
    Size,
}

/// Reports the position of the current record, or the size of its batch
pub struct BatchFunction {
    field: Field,
}

pub fn new_batch_index_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(BatchFunction {
        field: Field::Index,
    }))
}

pub fn new_batch_size_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(BatchFunction { field: Field::Size }))
}

impl Function for BatchFunction {
    #[allow(clippy::cast_possible_wrap)]
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let n = match self.field {
            Field::Index => ctx.index(),
            Field::Size => ctx.batch().len(),
        };
        Ok(Value::Int(n as i64))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        match self.field {
            Field::Index => "batch_index()".to_string(),
            Field::Size => "batch_size()".to_string(),
        }
    }
}
