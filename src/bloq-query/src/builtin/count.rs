use bloq_shared::{Error, Result, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::string("name")];

inventory::submit! {
    FunctionRegistration {
        name: "count",
        params: PARAMS,
        ctor: new_count_function,
    }
}

/// A counter owned by the function instance
///
/// Returns 1 on the first call and increments on each call after that,
/// regardless of the context. The name labels the counter in descriptions.
pub struct CountFunction {
    name: String,
    counter: AtomicI64,
}

pub fn new_count_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let name = match args.into_iter().next() {
        Some(Arg::Value(Value::String(name))) => name,
        _ => {
            return Err(Error::invalid_arguments(
                "count",
                "expected a literal string name",
            ))
        }
    };
    Ok(Arc::new(CountFunction {
        name,
        counter: AtomicI64::new(0),
    }))
}

impl Function for CountFunction {
    fn exec(&self, _ctx: &FunctionContext) -> Result<Value> {
        Ok(Value::Int(self.counter.fetch_add(1, Ordering::Relaxed) + 1))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        format!("count(\"{}\")", self.name)
    }
}
