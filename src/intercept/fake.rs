//! Fake mode: stub every operation, keep the originals as `native_<op>`.
//!
//! A faked type answers each declared operation with `Value::Nil` unless the
//! operation was omitted or redefined. The original implementation of every
//! stubbed operation stays reachable under `native_<op>`, which custom
//! definitions typically call:
//!
//! ```ignore
//! let class = fake::<Calculator, _>(&["reset"], |def| {
//!     def.define("add", |fake, args| {
//!         let sum = fake.invoke("native_add", args)?;
//!         Ok(Value::from(sum.as_int().unwrap_or(0) + 1))
//!     });
//! })?;
//! let mut calculator = class.construct();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use interpose_value::Value;
use tracing::{debug, trace, warn};

use crate::error::InvokeError;
use crate::invoker::{Args, Declared, Invoker};
use crate::surface::{answer_reserved, is_reserved, ObjectId, Surface};

pub const NATIVE_PREFIX: &str = "native_";

/// Name under which the original of `operation` is kept.
pub fn native_name(operation: &str) -> String {
    format!("{NATIVE_PREFIX}{operation}")
}

/// Custom operation body. Receives the fake itself, so it can call other
/// operations, including the `native_` originals.
pub type Body<T> = Arc<dyn Fn(&mut Fake<T>, Args) -> Result<Value, InvokeError> + Send + Sync>;

enum Slot<T> {
    Stub,
    Passthrough,
    Native(String),
    Custom(Body<T>),
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            Slot::Stub => Slot::Stub,
            Slot::Passthrough => Slot::Passthrough,
            Slot::Native(original) => Slot::Native(original.clone()),
            Slot::Custom(body) => Slot::Custom(Arc::clone(body)),
        }
    }
}

struct Table<T> {
    surface: Surface,
    slots: HashMap<String, Slot<T>>,
}

/// Collects the omit list and custom definitions of a faked type.
pub struct FakeBuilder<T> {
    declared: Surface,
    omit: Vec<String>,
    definitions: Vec<(String, Body<T>)>,
}

impl<T: Invoker> FakeBuilder<T> {
    pub fn new(declared: Surface) -> Self {
        Self {
            declared,
            omit: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Leave `operation` untouched: it keeps running the original and gets
    /// no `native_` alias.
    pub fn omit(&mut self, operation: impl Into<String>) -> &mut Self {
        self.omit.push(operation.into());
        self
    }

    /// Give `operation` a custom body. Later definitions of the same name
    /// win. Names outside the declared surface become new operations.
    pub fn define<F>(&mut self, operation: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(&mut Fake<T>, Args) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.definitions.push((operation.into(), Arc::new(body)));
        self
    }

    /// Resolve every slot and freeze the faked type.
    pub fn build(self) -> Result<FakeClass<T>, InvokeError> {
        let mut names: Vec<String> = Vec::new();
        let mut slots: HashMap<String, Slot<T>> = HashMap::new();

        for operation in self.declared.names() {
            if self.omit.iter().any(|o| o == operation) {
                names.push(operation.to_string());
                slots.insert(operation.to_string(), Slot::Passthrough);
                continue;
            }
            names.push(operation.to_string());
            slots.insert(operation.to_string(), Slot::Stub);

            let alias = native_name(operation);
            if self.declared.contains(&alias) {
                warn!(operation, alias = %alias, "native alias shadows a declared operation; skipping");
                continue;
            }
            names.push(alias.clone());
            slots.insert(alias, Slot::Native(operation.to_string()));
        }

        for omitted in &self.omit {
            if !self.declared.contains(omitted) {
                debug!(operation = %omitted, "omitted operation is not declared");
            }
        }

        for (operation, body) in self.definitions {
            if is_reserved(&operation) {
                return Err(InvokeError::ReservedOperation(operation));
            }
            if !slots.contains_key(&operation) {
                names.push(operation.clone());
            }
            debug!(operation = %operation, "custom fake definition");
            slots.insert(operation, Slot::Custom(body));
        }

        Ok(FakeClass {
            table: Arc::new(Table {
                surface: Surface::capture(names),
                slots,
            }),
        })
    }
}

/// A faked type. Building it creates no instance; call
/// [`FakeClass::instantiate`] or [`FakeClass::construct`].
pub struct FakeClass<T> {
    table: Arc<Table<T>>,
}

impl<T> Clone for FakeClass<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<T> fmt::Debug for FakeClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeClass")
            .field("surface", &self.table.surface)
            .finish()
    }
}

impl<T: Invoker + Declared> FakeClass<T> {
    /// Start a faked type from the operations `T` declares.
    pub fn builder() -> FakeBuilder<T> {
        FakeBuilder::new(Surface::declared::<T>())
    }
}

impl<T: Invoker> FakeClass<T> {
    /// Fake `target`; its originals stay reachable as `native_<op>`.
    pub fn instantiate(&self, target: T) -> Fake<T> {
        Fake {
            target,
            table: Arc::clone(&self.table),
            id: ObjectId::next(),
        }
    }

    /// Build the target with `T::default()` and fake it.
    pub fn construct(&self) -> Fake<T>
    where
        T: Default,
    {
        self.instantiate(T::default())
    }

    /// Operations the faked type answers, aliases included.
    pub fn surface(&self) -> &Surface {
        &self.table.surface
    }

    /// Whether `operation` answers with the no-op stub.
    pub fn is_stubbed(&self, operation: &str) -> bool {
        matches!(self.table.slots.get(operation), Some(Slot::Stub))
    }
}

/// Instance of a faked type.
pub struct Fake<T> {
    target: T,
    table: Arc<Table<T>>,
    id: ObjectId,
}

impl<T: Invoker> Fake<T> {
    /// The object behind the `native_` aliases.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable access to the target.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Identity of the fake, distinct from the target's.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Operations this fake answers.
    pub fn surface(&self) -> &Surface {
        &self.table.surface
    }

    /// Unwrap, dropping the stub table.
    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<T: Invoker> Invoker for Fake<T> {
    fn operations(&self) -> Vec<String> {
        self.table.surface.with_reserved()
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        if is_reserved(operation) {
            let id = self.id;
            return answer_reserved(self, id, operation, args);
        }
        let slot = self
            .table
            .slots
            .get(operation)
            .cloned()
            .ok_or_else(|| InvokeError::no_such_operation(operation))?;

        match slot {
            Slot::Stub => {
                trace!(operation, "stubbed call");
                Ok(Value::Nil)
            }
            Slot::Passthrough => self.target.invoke(operation, args),
            Slot::Native(original) => self.target.invoke(&original, args),
            Slot::Custom(body) => body(self, args),
        }
    }
}

/// Fake a type: stub everything except `omit`, then let `customize` redefine
/// operations.
pub fn fake<T, F>(omit: &[&str], customize: F) -> Result<FakeClass<T>, InvokeError>
where
    T: Invoker + Declared,
    F: FnOnce(&mut FakeBuilder<T>),
{
    let mut builder = FakeClass::<T>::builder();
    for operation in omit {
        builder.omit(*operation);
    }
    customize(&mut builder);
    builder.build()
}

/// Fake a single existing instance, using the surface it reports.
pub fn fake_instance<T, F>(target: T, omit: &[&str], customize: F) -> Result<Fake<T>, InvokeError>
where
    T: Invoker,
    F: FnOnce(&mut FakeBuilder<T>),
{
    let mut builder = FakeBuilder::new(Surface::of(&target));
    for operation in omit {
        builder.omit(*operation);
    }
    customize(&mut builder);
    Ok(builder.build()?.instantiate(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::object::Object;

    fn shouter() -> Object {
        Object::builder("Shouter")
            .method("shout", |_, args| {
                let text: String = args.arg(0)?;
                Ok(text.to_uppercase().into())
            })
            .method("whisper", |_, args| {
                let text: String = args.arg(0)?;
                Ok(text.to_lowercase().into())
            })
            .build()
    }

    #[test]
    fn test_surface_interleaves_aliases() {
        let fake = fake_instance(shouter(), &["whisper"], |_| {}).expect("fake");
        assert_eq!(
            fake.surface().names().collect::<Vec<_>>(),
            vec!["shout", "native_shout", "whisper"]
        );
    }

    #[test]
    fn test_reserved_definition_is_rejected() {
        let result = fake_instance(shouter(), &[], |def| {
            def.define("object_id", |_, _| Ok(Value::Nil));
        });
        assert!(matches!(result, Err(InvokeError::ReservedOperation(_))));
    }

    #[test]
    fn test_definition_adds_new_operation() {
        let mut fake = fake_instance(shouter(), &[], |def| {
            def.define("echo_twice", |fake, args| {
                let once = fake.invoke("native_shout", args.clone())?;
                let twice = fake.invoke("native_shout", args)?;
                Ok(Value::List(vec![once, twice]))
            });
        })
        .expect("fake");
        assert_eq!(
            fake.invoke("echo_twice", args!["hey"]).expect("call"),
            Value::from(vec!["HEY", "HEY"])
        );
    }

    #[test]
    fn test_native_alias_does_not_shadow_declared_operation() {
        let target = Object::builder("Odd")
            .method("run", |_, _| Ok(Value::from("run")))
            .method("native_run", |_, _| Ok(Value::from("declared")))
            .build();
        let mut fake = fake_instance(target, &["native_run"], |_| {}).expect("fake");
        assert_eq!(fake.invoke("run", args![]).expect("call"), Value::Nil);
        assert_eq!(
            fake.invoke("native_run", args![]).expect("call"),
            Value::from("declared")
        );
    }
}
