//! Shared fixtures: a statically typed target implementing `Invoker` by hand.

#![allow(dead_code)]

use interpose::{Args, Declared, InvokeError, Invoker, Value};

/// Calculator that remembers every call it receives.
#[derive(Debug, Default)]
pub struct Calculator {
    pub memory: i64,
    pub received: Vec<(String, Vec<Value>)>,
}

impl Calculator {
    const OPERATIONS: [&'static str; 6] = ["add", "sub", "store", "recall", "each", "object_id"];
}

impl Declared for Calculator {
    fn declared_operations() -> Vec<String> {
        Self::OPERATIONS.iter().map(|s| s.to_string()).collect()
    }
}

impl Invoker for Calculator {
    fn operations(&self) -> Vec<String> {
        Self::declared_operations()
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        self.received.push((operation.to_string(), args.values.clone()));
        match operation {
            "add" => {
                args.expect_arity(operation, 2)?;
                Ok(Value::Int(args.arg::<i64>(0)? + args.arg::<i64>(1)?))
            }
            "sub" => {
                args.expect_arity(operation, 2)?;
                Ok(Value::Int(args.arg::<i64>(0)? - args.arg::<i64>(1)?))
            }
            "store" => {
                self.memory = args.arg(0)?;
                Ok(Value::Nil)
            }
            "recall" => Ok(Value::Int(self.memory)),
            "each" => {
                let items: Vec<i64> = args.arg(0)?;
                let mut out = Vec::new();
                for item in items {
                    out.push(args.yield_block(operation, &[Value::Int(item)])?);
                }
                Ok(Value::List(out))
            }
            "object_id" => Ok(Value::from("calculator identity")),
            other => Err(InvokeError::no_such_operation(other)),
        }
    }
}
