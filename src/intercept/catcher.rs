//! Catcher mode: a single dispatcher handles every call.
//!
//! Until `method_call` is overridden the dispatcher forwards to the target,
//! so a fresh catcher behaves exactly like the object it wraps. An override
//! replaces forwarding entirely; it can still reach the target through the
//! `&mut T` it receives, or by calling [`Catcher::forward`].

use std::sync::Arc;

use interpose_value::Value;
use tracing::{debug, trace};

use crate::error::InvokeError;
use crate::invoker::{Args, Invoker};
use crate::surface::{answer_reserved, is_reserved, ObjectId, Surface};

pub type Dispatcher<T> = Arc<dyn Fn(&mut T, &str, Args) -> Result<Value, InvokeError> + Send + Sync>;

pub struct Catcher<T> {
    target: T,
    surface: Arc<Surface>,
    method_call: Option<Dispatcher<T>>,
    id: ObjectId,
}

impl<T: Invoker> Catcher<T> {
    /// Wrap an existing instance, capturing its current surface.
    pub fn new(target: T) -> Self {
        let surface = Arc::new(Surface::of(&target));
        Self::with_surface(surface, target)
    }

    pub(crate) fn with_surface(surface: Arc<Surface>, target: T) -> Self {
        Self {
            target,
            surface,
            method_call: None,
            id: ObjectId::next(),
        }
    }

    /// The default dispatcher: run `operation` on the target.
    pub fn forward(target: &mut T, operation: &str, args: Args) -> Result<Value, InvokeError> {
        target.invoke(operation, args)
    }

    /// Replace the dispatcher.
    pub fn method_call<F>(&mut self, dispatcher: F) -> &mut Self
    where
        F: Fn(&mut T, &str, Args) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        debug!("overrode method_call dispatcher");
        self.method_call = Some(Arc::new(dispatcher));
        self
    }

    /// Go back to forwarding every call to the target.
    pub fn reset_method_call(&mut self) -> &mut Self {
        self.method_call = None;
        self
    }

    /// Whether a custom dispatcher replaced forwarding.
    pub fn is_overridden(&self) -> bool {
        self.method_call.is_some()
    }

    /// Operations this catcher intercepts.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Identity of the catcher, distinct from the target's.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The object calls are forwarded to.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable access to the target, bypassing the dispatcher.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Unwrap, dropping the dispatcher.
    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T: Invoker> Invoker for Catcher<T> {
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
        trace!(operation, overridden = self.method_call.is_some(), "caught call");

        match &self.method_call {
            Some(dispatcher) => dispatcher(&mut self.target, operation, args),
            None => Self::forward(&mut self.target, operation, args),
        }
    }
}
