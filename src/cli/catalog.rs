//! Built-in demo targets for call scripts.

use interpose::object::Fields;
use interpose::{Args, InvokeError, Object, Value};

pub const TARGETS: [&str; 2] = ["calculator", "counter"];

/// Build the demo target called `name`.
pub fn build(name: &str) -> Option<Object> {
    match name {
        "calculator" => Some(calculator()),
        "counter" => Some(counter()),
        _ => None,
    }
}

fn calculator() -> Object {
    Object::builder("Calculator")
        .method("add", arith("add", i64::checked_add, |a, b| a + b))
        .method("sub", arith("sub", i64::checked_sub, |a, b| a - b))
        .method("mul", arith("mul", i64::checked_mul, |a, b| a * b))
        .method("div", |_, args| {
            args.expect_arity("div", 2)?;
            let divisor: f64 = args.arg(1)?;
            if divisor == 0.0 {
                return Err(InvokeError::failed("div: division by zero"));
            }
            match (args.arg::<i64>(0), args.arg::<i64>(1)) {
                (Ok(a), Ok(b)) if a.checked_rem(b) == Some(0) => a
                    .checked_div(b)
                    .map(Value::Int)
                    .ok_or_else(|| InvokeError::failed("div: integer overflow")),
                _ => Ok(Value::Float(args.arg::<f64>(0)? / divisor)),
            }
        })
        .method("negate", |_, args| {
            args.expect_arity("negate", 1)?;
            match args.arg::<i64>(0) {
                Ok(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| InvokeError::failed("negate: integer overflow")),
                Err(_) => Ok(Value::Float(-args.arg::<f64>(0)?)),
            }
        })
        .build()
}

fn arith(
    operation: &'static str,
    ints: fn(i64, i64) -> Option<i64>,
    floats: fn(f64, f64) -> f64,
) -> impl Fn(&mut Fields, Args) -> Result<Value, InvokeError> + Send + Sync + 'static {
    move |_, args| {
        args.expect_arity(operation, 2)?;
        match (args.arg::<i64>(0), args.arg::<i64>(1)) {
            (Ok(a), Ok(b)) => ints(a, b)
                .map(Value::Int)
                .ok_or_else(|| InvokeError::failed(format!("{operation}: integer overflow"))),
            _ => Ok(Value::Float(floats(args.arg(0)?, args.arg(1)?))),
        }
    }
}

fn counter() -> Object {
    fn count(fields: &Fields) -> i64 {
        fields.get("count").and_then(Value::as_int).unwrap_or(0)
    }

    fn step(
        fields: &mut Fields,
        args: &Args,
        operation: &str,
        sign: i64,
    ) -> Result<Value, InvokeError> {
        let by = if args.is_empty() { 1 } else { args.arg::<i64>(0)? };
        let next = by
            .checked_mul(sign)
            .and_then(|delta| count(fields).checked_add(delta))
            .ok_or_else(|| InvokeError::failed(format!("{operation}: integer overflow")))?;
        fields.insert("count".to_string(), Value::Int(next));
        Ok(Value::Int(next))
    }

    Object::builder("Counter")
        .field("count", 0)
        .method("increment", |fields, args| step(fields, &args, "increment", 1))
        .method("decrement", |fields, args| step(fields, &args, "decrement", -1))
        .method("value", |fields, _| Ok(Value::Int(count(fields))))
        .method("reset", |fields, _| {
            fields.insert("count".to_string(), Value::Int(0));
            Ok(Value::Nil)
        })
        .build()
}
