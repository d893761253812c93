//! Dynamic objects built from named method closures.
//!
//! An [`Object`] is a target whose operations are registered at runtime, in
//! the same builder style host functions are registered on an interface:
//!
//! ```ignore
//! let counter = Object::builder("Counter")
//!     .field("count", 0)
//!     .method("increment", |fields, _args| {
//!         let next = fields["count"].as_int().unwrap_or(0) + 1;
//!         fields.insert("count".into(), next.into());
//!         Ok(next.into())
//!     })
//!     .build();
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use interpose_value::Value;
use tracing::debug;

use crate::error::InvokeError;
use crate::invoker::{Args, Invoker};
use crate::surface::{answer_reserved, is_reserved, ObjectId, IDENTITY, RAW_INVOKE};

/// Instance state of an [`Object`].
pub type Fields = BTreeMap<String, Value>;

/// Body of a method: mutable access to the fields plus the call arguments.
pub type Method = Arc<dyn Fn(&mut Fields, Args) -> Result<Value, InvokeError> + Send + Sync>;

/// A runtime-defined object.
pub struct Object {
    class: String,
    id: ObjectId,
    fields: Fields,
    methods: BTreeMap<String, Method>,
}

impl Object {
    pub fn builder(class: impl Into<String>) -> ObjectBuilder {
        ObjectBuilder {
            class: class.into(),
            fields: Fields::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Class name given to the builder.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Per-instance identity.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Value of field `name`, if set.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Whether `operation` is callable on this object.
    pub fn responds_to(&self, operation: &str) -> bool {
        operation == IDENTITY || operation == RAW_INVOKE || self.methods.contains_key(operation)
    }

    /// Add or replace a method after construction. Wrappers already built
    /// around this object keep the surface they captured.
    pub fn define_method<F>(&mut self, name: impl Into<String>, body: F) -> Result<(), InvokeError>
    where
        F: Fn(&mut Fields, Args) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let name = name.into();
        if is_reserved(&name) {
            return Err(InvokeError::ReservedOperation(name));
        }
        debug!(class = %self.class, method = %name, "defined method");
        self.methods.insert(name, Arc::new(body));
        Ok(())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class)
            .field("id", &self.id)
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Invoker for Object {
    /// Every object answers the identity accessor and the raw invoker in
    /// addition to its own methods.
    fn operations(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.push(IDENTITY.to_string());
        names.push(RAW_INVOKE.to_string());
        names
    }

    fn invoke(&mut self, operation: &str, args: Args) -> Result<Value, InvokeError> {
        if is_reserved(operation) {
            let id = self.id;
            return answer_reserved(self, id, operation, args);
        }
        let method = self
            .methods
            .get(operation)
            .cloned()
            .ok_or_else(|| InvokeError::no_such_operation(operation))?;
        method(&mut self.fields, args)
    }
}

/// Builder for [`Object`].
pub struct ObjectBuilder {
    class: String,
    fields: Fields,
    methods: BTreeMap<String, Method>,
}

impl ObjectBuilder {
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Register a method. Reserved names are skipped: every object already
    /// answers them.
    pub fn method<F>(mut self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Fields, Args) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        let name = name.into();
        if is_reserved(&name) {
            debug!(class = %self.class, method = %name, "ignoring reserved method name");
            return self;
        }
        self.methods.insert(name, Arc::new(body));
        self
    }

    pub fn build(self) -> Object {
        Object {
            class: self.class,
            id: ObjectId::next(),
            fields: self.fields,
            methods: self.methods,
        }
    }
}
