//! The calling convention shared by targets and wrappers.
//!
//! A target exposes its public operations by name through [`Invoker`]. Every
//! wrapper in this crate is itself an `Invoker`, so wrappers can be stacked
//! (a proxy around a tracker around a plain object).

use std::fmt;
use std::sync::Arc;

use interpose_value::{ConversionError, Value};

use crate::error::InvokeError;

/// A callable surface addressed by operation name.
pub trait Invoker {
    /// Names of the public operations. Wrappers read this once, when they
    /// are built, and never again.
    fn operations(&self) -> Vec<String>;

    /// Run `operation` with `args`.
    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError>;
}

impl<T: Invoker + ?Sized> Invoker for Box<T> {
    fn operations(&self) -> Vec<String> {
        (**self).operations()
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        (**self).invoke(operation, args)
    }
}

impl<T: Invoker + ?Sized> Invoker for &mut T {
    fn operations(&self) -> Vec<String> {
        (**self).operations()
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        (**self).invoke(operation, args)
    }
}

/// Type-level operation list, for wrapper types built before any instance
/// of the target exists.
pub trait Declared {
    fn declared_operations() -> Vec<String>;
}

/// Shared callable passed as the trailing block of a call.
pub type BlockFn = dyn Fn(&[Value]) -> Result<Value, InvokeError> + Send + Sync;

/// Optional trailing callable of a call.
#[derive(Clone)]
pub struct Block(Arc<BlockFn>);

impl Block {
    /// Wrap a closure as a block.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        Block(Arc::new(f))
    }

    /// Run the block with `values`.
    pub fn call(&self, values: &[Value]) -> Result<Value, InvokeError> {
        (self.0)(values)
    }

    /// Whether both handles point at the same callable.
    pub fn ptr_eq(&self, other: &Block) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

/// Arguments of a call: positional values plus an optional block.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub values: Vec<Value>,
    pub block: Option<Block>,
}

impl Args {
    /// Positional values with no block.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            block: None,
        }
    }

    /// No values and no block.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach `block`, replacing any block already present.
    pub fn with_block(mut self, block: Block) -> Self {
        self.block = Some(block);
        self
    }

    /// Number of positional values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no positional values were passed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Positional value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Convert the argument at `index` into `T`.
    pub fn arg<T>(&self, index: usize) -> Result<T, InvokeError>
    where
        T: TryFrom<Value, Error = ConversionError>,
    {
        let value = self
            .values
            .get(index)
            .cloned()
            .ok_or(InvokeError::MissingArgument { index })?;
        Ok(T::try_from(value)?)
    }

    /// Fail unless exactly `expected` positional values were passed.
    pub fn expect_arity(&self, operation: &str, expected: usize) -> Result<(), InvokeError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(InvokeError::Arity {
                operation: operation.to_string(),
                expected,
                got: self.values.len(),
            })
        }
    }

    /// Call the block with `values`, failing if the caller passed none.
    pub fn yield_block(&self, operation: &str, values: &[Value]) -> Result<Value, InvokeError> {
        match &self.block {
            Some(block) => block.call(values),
            None => Err(InvokeError::NoBlock {
                operation: operation.to_string(),
            }),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::new(values)
    }
}

/// Build [`Args`] from anything convertible into [`Value`].
///
/// ```ignore
/// calculator.invoke("add", args![1, 2])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::empty()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::new(vec![$($crate::Value::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_conversion() {
        let args = crate::args![2, "x"];
        assert_eq!(args.arg::<i64>(0).expect("int"), 2);
        assert_eq!(args.arg::<String>(1).expect("string"), "x");
        assert!(matches!(
            args.arg::<i64>(1),
            Err(InvokeError::Conversion(ConversionError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            args.arg::<i64>(5),
            Err(InvokeError::MissingArgument { index: 5 })
        ));
    }

    #[test]
    fn test_expect_arity() {
        let args = crate::args![1];
        assert!(args.expect_arity("neg", 1).is_ok());
        assert!(matches!(
            args.expect_arity("add", 2),
            Err(InvokeError::Arity { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_yield_block() {
        let args = Args::empty().with_block(Block::new(|values| Ok(Value::Int(values.len() as i64))));
        let result = args.yield_block("each", &[Value::Nil, Value::Nil]).expect("block");
        assert_eq!(result, Value::Int(2));

        let err = Args::empty().yield_block("each", &[]).unwrap_err();
        assert!(matches!(err, InvokeError::NoBlock { .. }));
    }

    #[test]
    fn test_block_identity_survives_clone() {
        let block = Block::new(|_| Ok(Value::Nil));
        let args = Args::empty().with_block(block.clone());
        let copied = args.clone();
        assert!(copied.block.as_ref().expect("block").ptr_eq(&block));
    }
}
