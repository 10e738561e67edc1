//! Built-in methods.
//!
//! A method wraps a receiver function. It evaluates the receiver first and
//! post-processes the result; receiver failures propagate unchanged except
//! through the recovering methods (`catch`, `or`).

use crate::function::{Arg, FunctionRef};
use crate::target::{TargetPath, TargetsContext};

pub mod apply;
pub mod case;
pub mod catch;
pub mod from;
pub mod get;
pub mod or;

/// Targets of the receiver followed by those of any dynamic arguments
pub(crate) fn method_targets(
    receiver: &FunctionRef,
    ctx: TargetsContext,
    args: &[Arg],
) -> (TargetsContext, Vec<TargetPath>) {
    let (ctx, mut paths) = receiver.query_targets(ctx);
    let (ctx, mut from_args) = crate::function::union_targets(ctx, args);
    paths.append(&mut from_args);
    (ctx, paths)
}

/// Render `receiver.name(args)` for descriptions
pub(crate) fn describe_method(receiver: &FunctionRef, name: &str, args: &[Arg]) -> String {
    format!(
        "{}.{}",
        receiver.description(),
        crate::function::describe_call(name, args)
    )
}
