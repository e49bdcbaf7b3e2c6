use std::{
    any::{Any, TypeId},
    borrow::{Borrow, Cow},
    fmt::Debug,
    sync::Arc,
};

/// Errors produced by user code (constructors, factories, callables)
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The container handle may be shared between threads,
/// so anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// A type-erased, shared value held or produced by the container
///
/// Cloning an instance clones the handle, not the value. Two instances are the
/// same object if [Instance::ptr_eq] returns true.
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub fn new<T: Injectable>(instance: T) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// Wraps an already shared value, keeping its identity
    ///
    /// An `Instance` given as the value is returned as is, never nested.
    pub fn from_arc<T: Injectable>(instance: Arc<T>) -> Self {
        let erased: Arc<dyn Any + Send + Sync + 'static> = instance;
        match erased.downcast::<Instance>() {
            Ok(inner) => (*inner).clone(),
            Err(instance) => Instance {
                info: TypeInfo::of::<T>(),
                instance,
            },
        }
    }

    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    pub fn is<T: Injectable>(&self) -> bool {
        self.info.type_id == TypeId::of::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.info.type_name
    }

    /// Returns true if both instances point to the same allocation
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.instance) as *const (),
            Arc::as_ptr(&other.instance) as *const (),
        )
    }
}

impl<T: Injectable> From<Arc<T>> for Instance {
    fn from(value: Arc<T>) -> Self {
        Instance::from_arc(value)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }
}

/// Key for bindings, registered instances and resolutions
///
/// Either names a type (see [Identifier::of]) or a parameter, e.g. `"name"`
/// for a primitive binding.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identifier(Cow<'static, str>);

impl Identifier {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Identifier(name.into())
    }

    /// Identifier of a type - works for trait objects as well, e.g. `Identifier::of::<dyn Service>()`
    pub fn of<T: 'static + ?Sized>() -> Self {
        Identifier(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Identifier {
    fn from(value: &'static str) -> Self {
        Identifier(Cow::Borrowed(value))
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier(Cow::Owned(value))
    }
}

impl From<&Identifier> for Identifier {
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

impl From<TypeInfo> for Identifier {
    fn from(value: TypeInfo) -> Self {
        Identifier(Cow::Borrowed(value.type_name))
    }
}
