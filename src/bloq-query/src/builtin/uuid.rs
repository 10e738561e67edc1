use bloq_shared::{Result, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::FunctionRegistration;
use crate::target::{TargetPath, TargetsContext};

inventory::submit! {
    FunctionRegistration {
        name: "uuid_v4",
        params: &[],
        ctor: new_uuid_v4_function,
    }
}

/// Generates a random version 4 UUID per call
pub struct UuidV4Function;

pub fn new_uuid_v4_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(UuidV4Function))
}

impl Function for UuidV4Function {
    fn exec(&self, _ctx: &FunctionContext) -> Result<Value> {
        Ok(Value::String(Uuid::new_v4().to_string()))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        "uuid_v4()".to_string()
    }
}
