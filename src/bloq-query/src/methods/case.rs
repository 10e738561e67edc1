use bloq_shared::{Error, Result, Value};
use std::sync::Arc;

use super::{describe_method, method_targets};
use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::MethodRegistration;
use crate::target::{TargetPath, TargetsContext};

inventory::submit! {
    MethodRegistration {
        name: "uppercase",
        params: &[],
        ctor: new_uppercase_method,
    }
}

inventory::submit! {
    MethodRegistration {
        name: "lowercase",
        params: &[],
        ctor: new_lowercase_method,
    }
}

#[derive(Clone, Copy)]
enum Case {
    Upper,
    Lower,
}

impl Case {
    fn name(self) -> &'static str {
        match self {
            Case::Upper => "uppercase",
            Case::Lower => "lowercase",
        }
    }
}

/// Converts a string receiver to upper or lower case
pub struct CaseMethod {
    receiver: FunctionRef,
    case: Case,
}

pub fn new_uppercase_method(receiver: FunctionRef, _args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(CaseMethod {
        receiver,
        case: Case::Upper,
    }))
}

pub fn new_lowercase_method(receiver: FunctionRef, _args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(CaseMethod {
        receiver,
        case: Case::Lower,
    }))
}

impl Function for CaseMethod {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        match self.receiver.exec(ctx)? {
            Value::String(s) => Ok(Value::String(match self.case {
                Case::Upper => s.to_uppercase(),
                Case::Lower => s.to_lowercase(),
            })),
            other => Err(Error::type_mismatch("string", &other)),
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        method_targets(&self.receiver, ctx, &[])
    }

    fn description(&self) -> String {
        describe_method(&self.receiver, self.case.name(), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::literal::new_literal_function;

    #[test]
    fn test_case_conversion() {
        let ctx = FunctionContext::default();
        let upper = new_uppercase_method(new_literal_function(Value::string("foo")), vec![]).unwrap();
        assert_eq!(upper.exec(&ctx).unwrap(), Value::string("FOO"));

        let lower = new_lowercase_method(new_literal_function(Value::string("BaR")), vec![]).unwrap();
        assert_eq!(lower.exec(&ctx).unwrap(), Value::string("bar"));
    }

    #[test]
    fn test_case_rejects_non_strings() {
        let f = new_uppercase_method(new_literal_function(Value::Int(5)), vec![]).unwrap();
        let err = f.exec(&FunctionContext::default()).unwrap_err();
        assert_eq!(err.to_string(), "expected string value, found integer");
    }

    #[test]
    fn test_case_propagates_receiver_failure() {
        let receiver = crate::registry::init_function("throw", vec![Arg::from("boom")]).unwrap();
        let f = new_lowercase_method(receiver, vec![]).unwrap();
        assert_eq!(
            f.exec(&FunctionContext::default()).unwrap_err(),
            Error::Thrown("boom".to_string())
        );
    }
}
