//! The polymorphic unit of computation.
//!
//! A [`Function`] is constructed once and then executed any number of times,
//! possibly from many threads at once, each time against its own
//! [`FunctionContext`]. Failures are ordinary `Err` values so that `catch`
//! and friends can treat them as data.

use std::fmt;
use std::sync::Arc;

use bloq_shared::{Error, Result, Value};

use crate::context::FunctionContext;
use crate::target::{TargetPath, TargetsContext};

/// A compiled query function
pub trait Function: Send + Sync {
    /// Evaluate against a context
    fn exec(&self, ctx: &FunctionContext) -> Result<Value>;

    /// Report every location this function may read, without executing it
    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>);

    /// Get a description of what this function does
    fn description(&self) -> String;
}

/// Shared handle on a function tree
pub type FunctionRef = Arc<dyn Function>;

impl fmt::Debug for dyn Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.description())
    }
}

/// A constructor argument: a static literal or a dynamic function
#[derive(Clone, Debug)]
pub enum Arg {
    /// Literal value fixed at construction
    Value(Value),
    /// Function evaluated on every call
    Function(FunctionRef),
}

impl Arg {
    /// Whether the argument is evaluated per call
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Arg::Function(_))
    }

    /// Evaluate the argument against a context
    pub fn resolve(&self, ctx: &FunctionContext) -> Result<Value> {
        match self {
            Arg::Value(v) => Ok(v.clone()),
            Arg::Function(f) => f.exec(ctx),
        }
    }

    /// Evaluate the argument and require a string result
    pub fn resolve_string(&self, ctx: &FunctionContext) -> Result<String> {
        match self {
            Arg::Value(Value::String(s)) => Ok(s.clone()),
            other => match other.resolve(ctx)? {
                Value::String(s) => Ok(s),
                v => Err(Error::type_mismatch("string", &v)),
            },
        }
    }

    /// Targets of a dynamic argument, none for literals
    pub fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        match self {
            Arg::Value(_) => (ctx, Vec::new()),
            Arg::Function(f) => f.query_targets(ctx),
        }
    }

    /// Short rendering for descriptions
    pub fn describe(&self) -> String {
        match self {
            Arg::Value(v) => v.to_string(),
            Arg::Function(f) => f.description(),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::string(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Value(Value::String(s))
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Arg::Value(Value::Int(i))
    }
}

impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Arg::Value(Value::from(i))
    }
}

impl From<FunctionRef> for Arg {
    fn from(f: FunctionRef) -> Self {
        Arg::Function(f)
    }
}

/// Union the targets of several functions and arguments, threading the
/// targets context through each in order
pub fn union_targets<'a, I>(ctx: TargetsContext, args: I) -> (TargetsContext, Vec<TargetPath>)
where
    I: IntoIterator<Item = &'a Arg>,
{
    let mut ctx = ctx;
    let mut paths = Vec::new();
    for arg in args {
        let (next, mut found) = arg.query_targets(ctx);
        ctx = next;
        paths.append(&mut found);
    }
    (ctx, paths)
}

/// Pull the next constructor argument, failing if it is missing
pub(crate) fn take_arg(name: &str, args: &mut std::vec::IntoIter<Arg>) -> Result<Arg> {
    args.next()
        .ok_or_else(|| Error::invalid_arguments(name, "missing argument"))
}

/// Render `name(arg, ...)` for descriptions
pub(crate) fn describe_call(name: &str, args: &[Arg]) -> String {
    let rendered: Vec<String> = args.iter().map(Arg::describe).collect();
    format!("{}({})", name, rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::literal::new_literal_function;

    #[test]
    fn test_static_arg_resolves_to_itself() {
        let arg = Arg::from("foo");
        assert!(!arg.is_dynamic());
        assert_eq!(
            arg.resolve(&FunctionContext::default()).unwrap(),
            Value::string("foo")
        );
    }

    #[test]
    fn test_dynamic_arg_executes() {
        let arg = Arg::from(new_literal_function(Value::Int(3)));
        assert!(arg.is_dynamic());
        assert_eq!(
            arg.resolve(&FunctionContext::default()).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn test_resolve_string_rejects_other_types() {
        let err = Arg::from(5i64)
            .resolve_string(&FunctionContext::default())
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_describe_call() {
        let args = vec![Arg::from("a"), Arg::from(1i64)];
        assert_eq!(describe_call("f", &args), "f(\"a\", 1)");
    }
}
