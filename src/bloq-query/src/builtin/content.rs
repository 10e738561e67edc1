use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::FunctionRegistration;
use crate::target::{TargetPath, TargetType, TargetsContext};

inventory::submit! {
    FunctionRegistration {
        name: "content",
        params: &[],
        ctor: new_content_function,
    }
}

/// Returns the raw body of the current record as a string
pub struct ContentFunction;

pub fn new_content_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(ContentFunction))
}

impl Function for ContentFunction {
    #[allow(clippy::cast_possible_wrap)]
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        let part = ctx.current_part().ok_or_else(|| Error::IndexOutOfBounds {
            index: ctx.index() as i64,
            len: ctx.batch().len(),
        })?;
        Ok(Value::string(String::from_utf8_lossy(part.body())))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (
            ctx,
            vec![TargetPath::new(TargetType::Value, Vec::<String>::new())],
        )
    }

    fn description(&self) -> String {
        "content()".to_string()
    }
}
