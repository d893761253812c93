//! Interpose: generated call surfaces around existing objects
//!
//! Wrap a target (anything implementing [`Invoker`]) in a surface that
//! intercepts every public operation. The surface is captured once, when
//! the wrapper is built, and never includes the reserved identity accessor
//! or raw invoker.
//!
//! ## Modes
//!
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────┐
//! │ proxy    │ before:<op> rewrites args, after:<op> rewrites   │
//! │          │ the result                                       │
//! │ track    │ before_call / after_call observe every call      │
//! │ catch    │ method_call dispatcher replaces forwarding       │
//! │ fake     │ every op is a no-op; originals kept as native_*  │
//! └──────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use interpose::{args, proxy, Invoker, Value};
//!
//! let mut calc = proxy(calculator);
//! calc.before("sub", |mut args| {
//!     args.values.reverse();
//!     Ok(args)
//! })?;
//! calc.after("add", |sum| Ok(Value::from(sum.as_int().unwrap_or(0) * 2)))?;
//! assert_eq!(calc.invoke("add", args![1, 2])?, Value::Int(6));
//! ```

pub mod error;
pub mod hooks;
pub mod intercept;
pub mod invoker;
pub mod object;
pub mod surface;

pub use error::InvokeError;
pub use hooks::{HookKey, HookPhase};
pub use intercept::{
    catch, fake, fake_instance, proxy, track, Catcher, CatcherClass, Class, Fake, FakeBuilder,
    FakeClass, Hook, Proxy, ProxyClass, Tracker, TrackerClass,
};
pub use interpose_value::{ConversionError, Value};
pub use invoker::{Args, Block, Declared, Invoker};
pub use object::{Object, ObjectBuilder};
pub use surface::{ObjectId, Surface};

/// Short alias for the entry points.
pub mod op {
    pub use crate::intercept::{catch, fake, fake_instance, proxy, track};
}
