use bloq_shared::{Result, Value};
use log::trace;
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{describe_call, Arg, Function, FunctionRef};
use crate::random::{int_for_seed, seed_from_value, SharedRng};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

const PARAMS: &[Param] = &[Param::int("seed").optional().dynamic()];

inventory::submit! {
    FunctionRegistration {
        name: "random_int",
        params: PARAMS,
        ctor: new_random_int_function,
    }
}

enum Source {
    /// Generator owned by the instance, seeded once
    Sequence(SharedRng),
    /// Seed evaluated on every call
    Dynamic(FunctionRef),
}

/// Generates non-negative pseudo-random integers
///
/// Without an argument the instance draws from a generator seeded with OS
/// entropy. A literal integer seeds that generator instead, so the sequence
/// of results is reproducible. A function argument is evaluated on every
/// call and its result seeds that call alone: equal seeds give equal
/// results, even across separate instances.
pub struct RandomIntFunction {
    seed: Option<Arg>,
    source: Source,
}

pub fn new_random_int_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let seed = args.into_iter().next();
    let source = match &seed {
        None => Source::Sequence(SharedRng::from_entropy()),
        Some(Arg::Value(v)) => Source::Sequence(SharedRng::seeded(seed_from_value(v))),
        Some(Arg::Function(f)) => Source::Dynamic(Arc::clone(f)),
    };
    Ok(Arc::new(RandomIntFunction { seed, source }))
}

impl Function for RandomIntFunction {
    fn exec(&self, ctx: &FunctionContext) -> Result<Value> {
        match &self.source {
            Source::Sequence(rng) => Ok(Value::Int(rng.next_int())),
            Source::Dynamic(f) => {
                let seed = seed_from_value(&f.exec(ctx)?);
                trace!("random_int reseeded with {}", seed);
                Ok(Value::Int(int_for_seed(seed)))
            }
        }
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        match &self.seed {
            Some(arg) => arg.query_targets(ctx),
            None => (ctx, Vec::new()),
        }
    }

    fn description(&self) -> String {
        describe_call("random_int", self.seed.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::literal::new_literal_function;
    use std::collections::HashSet;

    #[test]
    fn test_random_int_unseeded_spread() {
        let f = new_random_int_function(vec![]).unwrap();
        let ctx = FunctionContext::default();
        let seen: HashSet<i64> = (0..100)
            .map(|_| f.exec(&ctx).unwrap().as_int().unwrap())
            .collect();
        assert!(seen.len() > 90);
        assert!(seen.iter().all(|v| *v >= 0));
    }

    #[test]
    fn test_random_int_static_seed_sequence() {
        let a = new_random_int_function(vec![Arg::from(10i64)]).unwrap();
        let b = new_random_int_function(vec![Arg::from(10i64)]).unwrap();
        let ctx = FunctionContext::default();
        let first: Vec<Value> = (0..10).map(|_| a.exec(&ctx).unwrap()).collect();
        let second: Vec<Value> = (0..10).map(|_| b.exec(&ctx).unwrap()).collect();
        assert_eq!(first, second);

        // The generator advances between calls
        let distinct: HashSet<String> = first.iter().map(Value::to_string).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_random_int_dynamic_seed() {
        let seed = new_literal_function(Value::string("foo"));
        let a = new_random_int_function(vec![Arg::from(Arc::clone(&seed))]).unwrap();
        let b = new_random_int_function(vec![Arg::from(seed)]).unwrap();
        let ctx = FunctionContext::default();
        let expected = a.exec(&ctx).unwrap();
        for _ in 0..10 {
            assert_eq!(a.exec(&ctx).unwrap(), expected);
            assert_eq!(b.exec(&ctx).unwrap(), expected);
        }
    }

    #[test]
    fn test_random_int_description() {
        let f = new_random_int_function(vec![Arg::from(3i64)]).unwrap();
        assert_eq!(f.description(), "random_int(3)");
    }
}
