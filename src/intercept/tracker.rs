//! Tracker mode: one observer before and one after every call.
//!
//! Observers see the operation name with its arguments or its result. They
//! cannot change either; the caller always receives the target's result.

use std::sync::Arc;

use interpose_value::Value;
use tracing::{debug, trace};

use crate::error::InvokeError;
use crate::invoker::{Args, Invoker};
use crate::surface::{answer_reserved, is_reserved, ObjectId, Surface};

pub type BeforeCallHook = Arc<dyn Fn(&str, &Args) -> Result<(), InvokeError> + Send + Sync>;
pub type AfterCallHook = Arc<dyn Fn(&str, &Value) -> Result<(), InvokeError> + Send + Sync>;

pub struct Tracker<T> {
    wrapped: T,
    surface: Arc<Surface>,
    before_call: Option<BeforeCallHook>,
    after_call: Option<AfterCallHook>,
    id: ObjectId,
}

impl<T: Invoker> Tracker<T> {
    /// Wrap an existing instance, capturing its current surface.
    pub fn new(target: T) -> Self {
        let surface = Arc::new(Surface::of(&target));
        Self::with_surface(surface, target)
    }

    pub(crate) fn with_surface(surface: Arc<Surface>, target: T) -> Self {
        Self {
            wrapped: target,
            surface,
            before_call: None,
            after_call: None,
            id: ObjectId::next(),
        }
    }

    /// Set the observer run before every intercepted call.
    pub fn before_call<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, &Args) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        if self.before_call.replace(Arc::new(hook)).is_some() {
            debug!("replaced before_call hook");
        }
        self
    }

    /// Set the observer run after every intercepted call that returned.
    pub fn after_call<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, &Value) -> Result<(), InvokeError> + Send + Sync + 'static,
    {
        if self.after_call.replace(Arc::new(hook)).is_some() {
            debug!("replaced after_call hook");
        }
        self
    }

    /// Remove both observers.
    pub fn clear_hooks(&mut self) {
        self.before_call = None;
        self.after_call = None;
    }

    /// Operations this tracker observes.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Identity of the tracker, distinct from the wrapped object's.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The wrapped object.
    pub fn wrapped(&self) -> &T {
        &self.wrapped
    }

    /// Mutable access to the wrapped object, bypassing observers.
    pub fn wrapped_mut(&mut self) -> &mut T {
        &mut self.wrapped
    }

    /// Unwrap, dropping both observers.
    pub fn into_inner(self) -> T {
        self.wrapped
    }
}

impl<T: Invoker> Invoker for Tracker<T> {
    fn operations(&self) -> Vec<String> {
        self.surface.with_reserved()
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        if is_reserved(operation) {
            let id = self.id;
            return answer_reserved(self, id, operation, args);
        }
        if !self.surface.contains(operation) {
            return Err(InvokeError::no_such_operation(operation));
        }
        trace!(operation, "tracked call");

        if let Some(hook) = &self.before_call {
            hook(operation, &args)?;
        }
        let result = self.wrapped.invoke(operation, args)?;
        if let Some(hook) = &self.after_call {
            hook(operation, &result)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::object::Object;
    use std::sync::Mutex;

    #[test]
    fn test_second_registration_overwrites_first() {
        let target = Object::builder("Noop").method("run", |_, _| Ok(Value::Nil)).build();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = Tracker::new(target);

        let first = Arc::clone(&seen);
        tracker.before_call(move |_, _| {
            first.lock().expect("lock").push("first");
            Ok(())
        });
        let second = Arc::clone(&seen);
        tracker.before_call(move |_, _| {
            second.lock().expect("lock").push("second");
            Ok(())
        });

        tracker.invoke("run", args![]).expect("call");
        assert_eq!(*seen.lock().expect("lock"), vec!["second"]);
    }

    #[test]
    fn test_clear_hooks() {
        let target = Object::builder("Noop").method("run", |_, _| Ok(Value::Nil)).build();
        let mut tracker = Tracker::new(target);
        tracker.after_call(|_, _| Err(InvokeError::failed("should not run")));
        tracker.clear_hooks();
        assert_eq!(tracker.invoke("run", args![]).expect("call"), Value::Nil);
    }
}
