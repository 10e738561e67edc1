use bloq_shared::{Result, Value};
use std::sync::Arc;

use super::json::current_body;
use crate::context::FunctionContext;
use crate::function::{Function, FunctionRef};
use crate::target::{split_path, TargetPath, TargetType, TargetsContext};

/// Reads a dotted path from the bound value, or from the current record
/// body when no value is bound
///
/// Missing fields yield `null`.
pub struct FieldFunction {
    path: Vec<String>,
}

/// Create a field reference; the empty path selects the whole value
pub fn new_field_function(path: &str) -> FunctionRef {
    Arc::new(FieldFunction {
        path: split_path(path),
    })
}

impl Function for FieldFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        match ctx.value() {
            Some(value) => value.field_path(&self.path),
            None => current_body(ctx)?.field_path(&self.path),
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (
            ctx,
            vec![TargetPath::new(TargetType::Value, self.path.iter().cloned())],
        )
    }

    fn description(&self) -> String {
        if self.path.is_empty() {
            "this".to_string()
        } else {
            format!("this.{}", self.path.join("."))
        }
    }
}
