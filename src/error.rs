//! Error types for intercepted calls.

use interpose_value::ConversionError;
use thiserror::Error;

/// Errors raised while dispatching through a wrapper or a target.
///
/// Wrappers never swallow errors: whatever a hook or the target returns is
/// handed back to the caller unchanged.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The operation is not on the surface of the wrapper or target.
    #[error("no such operation: {operation}")]
    NoSuchOperation { operation: String },

    /// A hook key did not follow `before:<op>` / `after:<op>`.
    #[error("invalid hook key '{0}': expected before:<op>, after:<op>, before_<op> or after_<op>")]
    InvalidHookKey(String),

    /// A before-hook was registered under an after key, or the reverse.
    #[error("hook registered under '{key}' does not match its phase")]
    HookPhaseMismatch { key: String },

    /// Reserved operations cannot be intercepted or redefined.
    #[error("operation '{0}' is reserved and cannot be intercepted")]
    ReservedOperation(String),

    #[error("wrong number of arguments for '{operation}': expected {expected}, got {got}")]
    Arity {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("missing argument at position {index}")]
    MissingArgument { index: usize },

    #[error("no block given to '{operation}'")]
    NoBlock { operation: String },

    #[error("argument conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Failure raised by a target operation or a hook.
    #[error("{0}")]
    Failed(String),
}

impl InvokeError {
    pub fn no_such_operation(operation: impl Into<String>) -> Self {
        InvokeError::NoSuchOperation {
            operation: operation.into(),
        }
    }

    pub fn failed(message: impl std::fmt::Display) -> Self {
        InvokeError::Failed(message.to_string())
    }
}
