//! Intercepted operation surfaces and reserved operations.
//!
//! A [`Surface`] is captured once, when a wrapper or wrapper type is built.
//! Three names are never part of it: the identity accessor, the raw invoker,
//! and the constructor. Intercepting the first two would make a wrapper call
//! back into itself while dispatching.

use std::sync::atomic::{AtomicU64, Ordering};

use interpose_value::Value;

use crate::error::InvokeError;
use crate::invoker::{Args, Invoker};

/// Identity accessor present on every object.
pub const IDENTITY: &str = "object_id";

/// Raw invoker: first argument names the operation to run.
pub const RAW_INVOKE: &str = "__send__";

/// Constructor name; never callable through a surface.
pub const CONSTRUCTOR: &str = "initialize";

pub const RESERVED: [&str; 3] = [IDENTITY, RAW_INVOKE, CONSTRUCTOR];

/// Whether `operation` is one of the names no surface may contain.
pub fn is_reserved(operation: &str) -> bool {
    RESERVED.contains(&operation)
}

/// Fixed, ordered set of intercepted operation names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    operations: Vec<String>,
}

impl Surface {
    /// Capture a surface from a list of names. Reserved names and duplicates
    /// are dropped; the first occurrence keeps its position.
    pub fn capture<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut operations: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if is_reserved(&name) || operations.contains(&name) {
                continue;
            }
            operations.push(name);
        }
        Self { operations }
    }

    /// Surface of an existing instance.
    pub fn of<T: Invoker + ?Sized>(target: &T) -> Self {
        Self::capture(target.operations())
    }

    /// Surface declared by a type.
    pub fn declared<T: crate::invoker::Declared>() -> Self {
        Self::capture(T::declared_operations())
    }

    /// Whether `operation` is part of the surface.
    pub fn contains(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
    }

    /// Intercepted names in capture order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(String::as_str)
    }

    /// Number of intercepted names.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing is intercepted.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Names a wrapper reports from [`Invoker::operations`]: the surface plus
    /// the identity accessor and raw invoker it answers itself.
    pub(crate) fn with_reserved(&self) -> Vec<String> {
        let mut names = self.operations.clone();
        names.push(IDENTITY.to_string());
        names.push(RAW_INVOKE.to_string());
        names
    }
}

/// Identity of an object or wrapper instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate a fresh identity, unique within the process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ObjectId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric identity.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Int(id.0 as i64)
    }
}

/// Answer a reserved operation on behalf of `receiver` without
/// intercepting it.
///
/// The raw invoker re-enters `receiver.invoke`, so the operation it names is
/// dispatched (and intercepted) like any direct call.
pub(crate) fn answer_reserved<R>(
    receiver: &mut R,
    id: ObjectId,
    operation: &str,
    args: Args,
) -> Result<Value, InvokeError>
where
    R: Invoker + ?Sized,
{
    match operation {
        IDENTITY => Ok(id.into()),
        RAW_INVOKE => {
            let Args { mut values, block } = args;
            if values.is_empty() {
                return Err(InvokeError::Arity {
                    operation: RAW_INVOKE.to_string(),
                    expected: 1,
                    got: 0,
                });
            }
            let name = String::try_from(values.remove(0))?;
            receiver.invoke(&name, Args { values, block })
        }
        _ => Err(InvokeError::no_such_operation(operation)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_drops_reserved_and_duplicates() {
        let surface = Surface::capture(["add", "object_id", "sub", "__send__", "add", "initialize"]);
        assert_eq!(surface.names().collect::<Vec<_>>(), vec!["add", "sub"]);
        assert!(!surface.contains(IDENTITY));
        assert!(!surface.contains(RAW_INVOKE));
    }

    #[test]
    fn test_with_reserved_lists_answered_names() {
        let surface = Surface::capture(["run"]);
        assert_eq!(surface.with_reserved(), vec!["run", IDENTITY, RAW_INVOKE]);
    }

    #[test]
    fn test_object_ids_are_unique() {
        let a = ObjectId::next();
        let b = ObjectId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }
}
