//! Proxy mode: per-operation before/after hooks.
//!
//! A before-hook receives the call's [`Args`] and returns the arguments the
//! target will actually see. An after-hook receives the raw result and
//! returns the result handed back to the caller. Order is strictly
//! before → target → after.

use std::collections::HashMap;
use std::sync::Arc;

use interpose_value::Value;
use tracing::{debug, trace};

use crate::error::InvokeError;
use crate::hooks::{HookKey, HookPhase};
use crate::invoker::{Args, Invoker};
use crate::surface::{answer_reserved, is_reserved, ObjectId, Surface};

pub type BeforeHook = Arc<dyn Fn(Args) -> Result<Args, InvokeError> + Send + Sync>;
pub type AfterHook = Arc<dyn Fn(Value) -> Result<Value, InvokeError> + Send + Sync>;

/// A hook of either phase, for registration by textual key.
#[derive(Clone)]
pub enum Hook {
    Before(BeforeHook),
    After(AfterHook),
}

impl Hook {
    pub fn before<F>(f: F) -> Self
    where
        F: Fn(Args) -> Result<Args, InvokeError> + Send + Sync + 'static,
    {
        Hook::Before(Arc::new(f))
    }

    pub fn after<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        Hook::After(Arc::new(f))
    }

    /// Which side of the call this hook runs on.
    pub fn phase(&self) -> HookPhase {
        match self {
            Hook::Before(_) => HookPhase::Before,
            Hook::After(_) => HookPhase::After,
        }
    }
}

/// Wrapper with a per-instance hook table.
pub struct Proxy<T> {
    wrapped: T,
    surface: Arc<Surface>,
    hooks: HashMap<HookKey, Hook>,
    id: ObjectId,
}

impl<T: Invoker> Proxy<T> {
    /// Wrap an existing instance, capturing its current surface.
    pub fn new(target: T) -> Self {
        let surface = Arc::new(Surface::of(&target));
        Self::with_surface(surface, target)
    }

    pub(crate) fn with_surface(surface: Arc<Surface>, target: T) -> Self {
        Self {
            wrapped: target,
            surface,
            hooks: HashMap::new(),
            id: ObjectId::next(),
        }
    }

    /// Register the before-hook for `operation`, replacing any previous one.
    pub fn before<F>(&mut self, operation: &str, hook: F) -> Result<&mut Self, InvokeError>
    where
        F: Fn(Args) -> Result<Args, InvokeError> + Send + Sync + 'static,
    {
        self.install(HookKey::before(operation), Hook::before(hook))
    }

    /// Register the after-hook for `operation`, replacing any previous one.
    pub fn after<F>(&mut self, operation: &str, hook: F) -> Result<&mut Self, InvokeError>
    where
        F: Fn(Value) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.install(HookKey::after(operation), Hook::after(hook))
    }

    /// Register a hook under a textual key such as `before:add` or
    /// `after_add`.
    pub fn register(&mut self, key: &str, hook: Hook) -> Result<&mut Self, InvokeError> {
        let parsed: HookKey = key.parse()?;
        if parsed.phase != hook.phase() {
            return Err(InvokeError::HookPhaseMismatch {
                key: key.to_string(),
            });
        }
        self.install(parsed, hook)
    }

    /// Remove a hook. Returns whether one was registered.
    pub fn unregister(&mut self, key: &HookKey) -> bool {
        let removed = self.hooks.remove(key).is_some();
        if removed {
            debug!(hook = %key, "unregistered proxy hook");
        }
        removed
    }

    /// Whether a hook is registered under `key`.
    pub fn has_hook(&self, key: &HookKey) -> bool {
        self.hooks.contains_key(key)
    }

    /// Operations this proxy intercepts.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Identity of the proxy, distinct from the wrapped object's.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The wrapped object.
    pub fn wrapped(&self) -> &T {
        &self.wrapped
    }

    /// Mutable access to the wrapped object, bypassing hooks.
    pub fn wrapped_mut(&mut self) -> &mut T {
        &mut self.wrapped
    }

    /// Swap in a new target, keeping the captured surface and all hooks.
    /// Returns the previous target.
    pub fn replace_wrapped(&mut self, target: T) -> T {
        std::mem::replace(&mut self.wrapped, target)
    }

    /// Unwrap, dropping every hook.
    pub fn into_inner(self) -> T {
        self.wrapped
    }

    fn install(&mut self, key: HookKey, hook: Hook) -> Result<&mut Self, InvokeError> {
        if is_reserved(&key.operation) {
            return Err(InvokeError::ReservedOperation(key.operation));
        }
        if !self.surface.contains(&key.operation) {
            return Err(InvokeError::no_such_operation(key.operation));
        }
        match self.hooks.insert(key.clone(), hook) {
            Some(_) => debug!(hook = %key, "replaced proxy hook"),
            None => debug!(hook = %key, "registered proxy hook"),
        }
        Ok(self)
    }
}

impl<T: Invoker> Invoker for Proxy<T> {
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
        trace!(operation, "proxy call");

        let args = match self.hooks.get(&HookKey::before(operation)) {
            Some(Hook::Before(hook)) => hook(args)?,
            _ => args,
        };

        let result = self.wrapped.invoke(operation, args)?;

        match self.hooks.get(&HookKey::after(operation)) {
            Some(Hook::After(hook)) => hook(result),
            _ => Ok(result),
        }
    }
}
