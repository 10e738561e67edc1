use bloq_shared::{Error, Result, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use std::fmt::Write;
use std::sync::Arc;

use crate::context::FunctionContext;
use crate::function::{Arg, Function, FunctionRef};
use crate::registry::{FunctionRegistration, Param};
use crate::target::{TargetPath, TargetsContext};

inventory::submit! {
    FunctionRegistration {
        name: "timestamp_unix_nano",
        params: &[],
        ctor: new_timestamp_unix_nano_function,
    }
}

inventory::submit! {
    FunctionRegistration {
        name: "timestamp_unix",
        params: &[],
        ctor: new_timestamp_unix_function,
    }
}

const UTC_PARAMS: &[Param] = &[Param::string("format").optional()];

inventory::submit! {
    FunctionRegistration {
        name: "timestamp_utc",
        params: UTC_PARAMS,
        ctor: new_timestamp_utc_function,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Seconds,
    Nanos,
}

/// Current wall clock time as a Unix timestamp
pub struct TimestampFunction {
    precision: Precision,
}

pub fn new_timestamp_unix_nano_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(TimestampFunction {
        precision: Precision::Nanos,
    }))
}

pub fn new_timestamp_unix_function(_args: Vec<Arg>) -> Result<FunctionRef> {
    Ok(Arc::new(TimestampFunction {
        precision: Precision::Seconds,
    }))
}

impl Function for TimestampFunction {
    fn exec(&self, _ctx: &FunctionContext) -> Result<Value> {
        let now = Utc::now();
        let ts = match self.precision {
            Precision::Seconds => now.timestamp(),
            // Out of range only past the year 2262
            Precision::Nanos => now
                .timestamp_nanos_opt()
                .unwrap_or_else(|| now.timestamp().saturating_mul(1_000_000_000)),
        };
        Ok(Value::Int(ts))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        match self.precision {
            Precision::Seconds => "timestamp_unix()".to_string(),
            Precision::Nanos => "timestamp_unix_nano()".to_string(),
        }
    }
}

/// Current UTC time formatted with a strftime pattern
pub struct TimestampUtcFunction {
    format: Option<String>,
}

pub fn new_timestamp_utc_function(args: Vec<Arg>) -> Result<FunctionRef> {
    let format = match args.into_iter().next() {
        None => None,
        Some(Arg::Value(Value::String(f))) => {
            if StrftimeItems::new(&f).any(|item| matches!(item, Item::Error)) {
                return Err(Error::invalid_arguments(
                    "timestamp_utc",
                    format!("invalid format '{}'", f),
                ));
            }
            Some(f)
        }
        Some(other) => {
            return Err(Error::invalid_arguments(
                "timestamp_utc",
                format!("expected a string format, found {}", other.describe()),
            ))
        }
    };
    Ok(Arc::new(TimestampUtcFunction { format }))
}

impl Function for TimestampUtcFunction {
    fn exec(&self, _ctx: &FunctionContext) -> Result<Value> {
        let now = Utc::now();
        let Some(format) = &self.format else {
            return Ok(Value::String(now.to_rfc3339()));
        };
        let mut rendered = String::new();
        write!(rendered, "{}", now.format(format)).map_err(|_| {
            Error::invalid_arguments("timestamp_utc", format!("invalid format '{}'", format))
        })?;
        Ok(Value::String(rendered))
    }

    fn query_targets(&self, ctx: TargetsContext) -> (TargetsContext, Vec<TargetPath>) {
        (ctx, Vec::new())
    }

    fn description(&self) -> String {
        match &self.format {
            Some(format) => format!("timestamp_utc(\"{}\")", format),
            None => "timestamp_utc()".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_unix_nano_advances() {
        let f = new_timestamp_unix_nano_function(vec![]).unwrap();
        let ctx = FunctionContext::default();
        let first = f.exec(&ctx).unwrap().as_int().unwrap();
        let second = f.exec(&ctx).unwrap().as_int().unwrap();
        assert!(first > 1_500_000_000_000_000_000);
        assert!(second >= first);
    }

    #[test]
    fn test_timestamp_unix_seconds() {
        let f = new_timestamp_unix_function(vec![]).unwrap();
        let secs = f.exec(&FunctionContext::default()).unwrap().as_int().unwrap();
        assert!(secs > 1_500_000_000);
        assert!(secs < 1_500_000_000_000);
    }

    #[test]
    fn test_timestamp_utc_format() {
        let f = new_timestamp_utc_function(vec![Arg::from("%Y")]).unwrap();
        let year = f.exec(&FunctionContext::default()).unwrap();
        let year: i64 = year.as_str().unwrap().parse().unwrap();
        assert!(year >= 2024);

        let f = new_timestamp_utc_function(vec![]).unwrap();
        let rfc = f.exec(&FunctionContext::default()).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(rfc.as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_timestamp_utc_rejects_bad_format() {
        assert!(new_timestamp_utc_function(vec![Arg::from("%Q")]).is_err());
    }

    #[test]
    fn test_timestamps_have_no_targets() {
        let f = new_timestamp_unix_nano_function(vec![]).unwrap();
        assert!(f.query_targets(TargetsContext::new()).1.is_empty());
    }
}
