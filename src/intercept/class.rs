//! Wrapper types built from a target type.
//!
//! A [`Class`] captures the surface `T` declares once and then stamps out any
//! number of wrapper instances. Each instance gets its own hook state; only
//! the surface is shared.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::intercept::{Catcher, Proxy, Tracker};
use crate::invoker::{Declared, Invoker};
use crate::surface::Surface;

/// Selects which wrapper a [`Class`] produces.
pub trait Mode {
    type Wrapper<T: Invoker>: Invoker;

    const NAME: &'static str;

    fn wrap<T: Invoker>(surface: Arc<Surface>, target: T) -> Self::Wrapper<T>;
}

/// Per-operation before/after hooks.
pub enum Proxying {}

/// One generic before/after observer pair.
pub enum Tracking {}

/// One overridable dispatcher.
pub enum Catching {}

impl Mode for Proxying {
    type Wrapper<T: Invoker> = Proxy<T>;
    const NAME: &'static str = "proxy";

    fn wrap<T: Invoker>(surface: Arc<Surface>, target: T) -> Proxy<T> {
        Proxy::with_surface(surface, target)
    }
}

impl Mode for Tracking {
    type Wrapper<T: Invoker> = Tracker<T>;
    const NAME: &'static str = "track";

    fn wrap<T: Invoker>(surface: Arc<Surface>, target: T) -> Tracker<T> {
        Tracker::with_surface(surface, target)
    }
}

impl Mode for Catching {
    type Wrapper<T: Invoker> = Catcher<T>;
    const NAME: &'static str = "catch";

    fn wrap<T: Invoker>(surface: Arc<Surface>, target: T) -> Catcher<T> {
        Catcher::with_surface(surface, target)
    }
}

/// A wrapper type over `T` in mode `M`.
pub struct Class<M, T> {
    surface: Arc<Surface>,
    _marker: PhantomData<fn() -> (M, T)>,
}

pub type ProxyClass<T> = Class<Proxying, T>;
pub type TrackerClass<T> = Class<Tracking, T>;
pub type CatcherClass<T> = Class<Catching, T>;

impl<M: Mode, T: Invoker + Declared> Class<M, T> {
    pub fn new() -> Self {
        Self {
            surface: Arc::new(Surface::declared::<T>()),
            _marker: PhantomData,
        }
    }
}

impl<M: Mode, T: Invoker + Declared> Default for Class<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Mode, T: Invoker> Class<M, T> {
    /// Wrap `target` in a fresh instance of this type.
    pub fn instantiate(&self, target: T) -> M::Wrapper<T> {
        M::wrap(Arc::clone(&self.surface), target)
    }

    /// Build the target with `T::default()` and wrap it.
    pub fn construct(&self) -> M::Wrapper<T>
    where
        T: Default,
    {
        self.instantiate(T::default())
    }

    /// Surface captured from `T`'s declared operations.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl<M, T> Clone for Class<M, T> {
    fn clone(&self) -> Self {
        Self {
            surface: Arc::clone(&self.surface),
            _marker: PhantomData,
        }
    }
}

impl<M: Mode, T> fmt::Debug for Class<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("mode", &M::NAME)
            .field("surface", &self.surface)
            .finish()
    }
}
