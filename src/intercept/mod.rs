//! Generated call surfaces.
//!
//! Each wrapper captures the target's surface once and then sends every
//! call on it through mode-specific interception:
//!
//! - [`Proxy`]: per-operation before/after hooks that may rewrite the call
//! - [`Tracker`]: one observer pair for every call
//! - [`Catcher`]: one dispatcher that replaces forwarding
//! - [`Fake`]: no-op stubs with the originals kept as `native_<op>`

mod catcher;
mod class;
mod fake;
mod proxy;
mod tracker;

pub use catcher::{Catcher, Dispatcher};
pub use class::{
    Catching, CatcherClass, Class, Mode, Proxying, ProxyClass, TrackerClass, Tracking,
};
pub use fake::{fake, fake_instance, native_name, Body, Fake, FakeBuilder, FakeClass, NATIVE_PREFIX};
pub use proxy::{AfterHook, BeforeHook, Hook, Proxy};
pub use tracker::{AfterCallHook, BeforeCallHook, Tracker};

use crate::invoker::Invoker;

/// Wrap `target` with before/after hook support.
pub fn proxy<T: Invoker>(target: T) -> Proxy<T> {
    Proxy::new(target)
}

/// Wrap `target` with a generic before-call/after-call observer pair.
pub fn track<T: Invoker>(target: T) -> Tracker<T> {
    Tracker::new(target)
}

/// Wrap `target` with a single overridable dispatcher.
pub fn catch<T: Invoker>(target: T) -> Catcher<T> {
    Catcher::new(target)
}
