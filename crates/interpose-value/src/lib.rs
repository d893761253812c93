//! Dynamic values for interpose.
//!
//! Every intercepted call carries its arguments and result as [`Value`]s, so
//! wrappers can forward, rewrite, and record calls without knowing the
//! concrete signature of the operation they stand in front of.

mod value;

pub use value::Value;

use thiserror::Error;

/// Error converting a [`Value`] into a concrete Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("integer {value} out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },

    #[error("list element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    pub(crate) fn mismatch(expected: &str, got: &Value) -> Self {
        ConversionError::TypeMismatch {
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }
}
