use std::{
    any::TypeId,
    borrow::Cow,
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use crate::{
    arguments::Arguments,
    errors::ArgumentError,
    types::{DynError, Identifier, Injectable, Instance, TypeInfo},
};

pub(crate) type BuildFn = Arc<dyn Fn(&Arguments) -> Result<Instance, DynError> + Send + Sync>;
pub(crate) type MethodFn =
    Arc<dyn Fn(&Instance, &Arguments) -> Result<Instance, DynError> + Send + Sync>;
pub(crate) type CastFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Describes how the container can construct a type
///
/// Implement this for every type the container should be able to build.
///
/// ```rust
/// use std::sync::Arc;
/// use wirebox_di::{Arguments, Describe, DynError, Parameter};
///
/// struct Engine;
/// struct Car {
///     engine: Arc<Engine>,
///     seats: i64,
/// }
///
/// impl Describe for Car {
///     fn parameters() -> Vec<Parameter> {
///         vec![
///             Parameter::class::<Engine>("engine"),
///             Parameter::builtin::<i64>("seats").with_default(4_i64),
///         ]
///     }
///
///     fn construct(args: &Arguments) -> Result<Self, DynError> {
///         Ok(Car {
///             engine: args.get("engine")?,
///             seats: args.cloned("seats")?,
///         })
///     }
/// }
/// ```
pub trait Describe: Injectable + Sized {
    /// Identifier the type is described under
    fn identifier() -> Identifier {
        Identifier::of::<Self>()
    }

    /// Constructor parameters, in declaration order
    fn parameters() -> Vec<Parameter>;

    /// Constructs the type from its resolved arguments
    fn construct(args: &Arguments) -> Result<Self, DynError>;

    /// Methods which can be invoked through [crate::Container::call]
    fn methods() -> Vec<Method> {
        Vec::new()
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// A described type or interface
    Class(Identifier),
    /// A primitive such as a string or integer - only bindable by parameter name
    Builtin(&'static str),
    /// No declared type
    Untyped,
}

/// A single parameter of a constructor, function or method
#[derive(Debug, Clone)]
pub struct Parameter {
    name: Cow<'static, str>,
    ty: ParamType,
    nullable: bool,
    default: Option<Instance>,
}

impl Parameter {
    fn new(name: impl Into<Cow<'static, str>>, ty: ParamType) -> Self {
        Parameter {
            name: name.into(),
            ty,
            nullable: false,
            default: None,
        }
    }

    /// Parameter of a described type or interface (`dyn Trait`)
    pub fn class<T: 'static + ?Sized>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, ParamType::Class(Identifier::of::<T>()))
    }

    /// Parameter of a type described under a custom identifier
    pub fn identified(name: impl Into<Cow<'static, str>>, identifier: impl Into<Identifier>) -> Self {
        Self::new(name, ParamType::Class(identifier.into()))
    }

    pub fn builtin<T: 'static + ?Sized>(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, ParamType::Builtin(std::any::type_name::<T>()))
    }

    /// Untyped parameters allow null and can be bound by name
    pub fn untyped(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, ParamType::Untyped)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default<T: Injectable>(self, value: T) -> Self {
        self.with_default_instance(Instance::new(value))
    }

    pub fn with_default_instance(mut self, value: impl Into<Instance>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    /// The identifier of a class typed parameter
    pub fn class_identifier(&self) -> Option<&Identifier> {
        match &self.ty {
            ParamType::Class(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.ty, ParamType::Builtin(_))
    }

    pub fn allows_null(&self) -> bool {
        self.nullable || self.ty == ParamType::Untyped
    }

    pub fn default_value(&self) -> Option<&Instance> {
        self.default.as_ref()
    }
}

/// How a concrete type gets instantiated
#[derive(Clone)]
pub struct Constructor {
    /// `None` if the type has no explicit constructor
    pub(crate) parameters: Option<Vec<Parameter>>,
    pub(crate) build: BuildFn,
}

/// Upcasts for the implementations of an interface
#[derive(Clone)]
pub struct InterfaceInfo {
    /// Type id of the `Arc<dyn Trait>` values are conformed to
    pub(crate) target: TypeInfo,
    pub(crate) casts: HashMap<TypeId, CastFn>,
}

impl InterfaceInfo {
    /// Converts an instance into the interface representation, if an upcast is known
    pub(crate) fn conform(&self, instance: Instance) -> Instance {
        if instance.info.type_id == self.target.type_id {
            return instance;
        }

        match self.casts.get(&instance.info.type_id) {
            Some(cast) => cast(&instance).unwrap_or(instance),
            None => {
                tracing::trace!(
                    "No upcast from {} to {} - keeping the instance as is",
                    instance.info,
                    self.target
                );
                instance
            }
        }
    }
}

#[derive(Clone)]
pub enum TypeKind {
    Concrete(Constructor),
    Interface(InterfaceInfo),
    /// Known, but cannot be instantiated
    Abstract,
}

/// Metadata of a type the container knows about
#[derive(Clone)]
pub struct TypeDescriptor {
    pub(crate) identifier: Identifier,
    /// The concrete type, if any
    pub(crate) info: Option<TypeInfo>,
    pub(crate) kind: TypeKind,
    pub(crate) methods: HashMap<String, Method>,
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            TypeKind::Concrete(_) => "concrete",
            TypeKind::Interface(_) => "interface",
            TypeKind::Abstract => "abstract",
        };
        f.debug_struct("TypeDescriptor")
            .field("identifier", &self.identifier)
            .field("kind", &kind)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TypeDescriptor {
    /// Descriptor of a type implementing [Describe]
    pub fn of<T: Describe>() -> Self {
        let build: BuildFn = Arc::new(|args: &Arguments| T::construct(args).map(Instance::new));
        let mut descriptor = TypeDescriptor {
            identifier: T::identifier(),
            info: Some(TypeInfo::of::<T>()),
            kind: TypeKind::Concrete(Constructor {
                parameters: Some(T::parameters()),
                build,
            }),
            methods: HashMap::new(),
        };
        for method in T::methods() {
            descriptor = descriptor.with_method(method);
        }
        descriptor
    }

    /// Descriptor of a type without an explicit constructor - built with [Default]
    pub fn implicit<T: Injectable + Default>() -> Self {
        let build: BuildFn = Arc::new(|_: &Arguments| Ok(Instance::new(T::default())));
        TypeDescriptor {
            identifier: Identifier::of::<T>(),
            info: Some(TypeInfo::of::<T>()),
            kind: TypeKind::Concrete(Constructor {
                parameters: None,
                build,
            }),
            methods: HashMap::new(),
        }
    }

    /// Descriptor of an interface, e.g. `TypeDescriptor::interface::<dyn Service>()`
    ///
    /// Values produced for an interface are stored as `Arc<dyn Trait>`,
    /// register implementations with [TypeDescriptor::implemented_by].
    pub fn interface<I: ?Sized + Send + Sync + 'static>() -> Self {
        TypeDescriptor {
            identifier: Identifier::of::<I>(),
            info: None,
            kind: TypeKind::Interface(InterfaceInfo {
                target: TypeInfo::of::<Arc<I>>(),
                casts: HashMap::new(),
            }),
            methods: HashMap::new(),
        }
    }

    /// Descriptor of a type that exists but can never be instantiated
    pub fn abstract_type(identifier: impl Into<Identifier>) -> Self {
        TypeDescriptor {
            identifier: identifier.into(),
            info: None,
            kind: TypeKind::Abstract,
            methods: HashMap::new(),
        }
    }

    /// Overrides the identifier the type is described under
    pub fn with_identifier(mut self, identifier: impl Into<Identifier>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.insert(method.name.to_string(), method);
        self
    }

    /// Registers the upcast from an implementation to this interface
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use wirebox_di::TypeDescriptor;
    ///
    /// trait Toy: Send + Sync {}
    /// struct Ball;
    /// impl Toy for Ball {}
    ///
    /// let toy = TypeDescriptor::interface::<dyn Toy>().implemented_by::<dyn Toy, Ball>(|ball| ball);
    /// ```
    pub fn implemented_by<I, C>(mut self, cast: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Injectable,
    {
        match &mut self.kind {
            TypeKind::Interface(interface) if interface.target.type_id == TypeId::of::<Arc<I>>() => {
                let cast: CastFn = Arc::new(move |instance: &Instance| {
                    instance
                        .downcast::<C>()
                        .ok()
                        .map(|concrete| Instance::new(cast(concrete)))
                });
                interface.casts.insert(TypeId::of::<C>(), cast);
            }
            _ => tracing::warn!(
                "Ignoring implementation {} for {} - it is not that interface",
                std::any::type_name::<C>(),
                self.identifier
            ),
        }
        self
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface(_))
    }

    pub fn is_instantiable(&self) -> bool {
        matches!(self.kind, TypeKind::Concrete(_))
    }

    /// Constructor parameters - `None` for types without an explicit constructor or which are not instantiable
    pub fn parameters(&self) -> Option<&[Parameter]> {
        match &self.kind {
            TypeKind::Concrete(constructor) => constructor.parameters.as_deref(),
            _ => None,
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }
}

/// A method which can be called on an instance of its type
#[derive(Clone)]
pub struct Method {
    pub(crate) name: Cow<'static, str>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) call: MethodFn,
}

impl Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Method {
    pub fn new<T, R, F>(name: impl Into<Cow<'static, str>>, parameters: Vec<Parameter>, method: F) -> Self
    where
        T: Injectable,
        R: Injectable,
        F: Fn(&T, &Arguments) -> Result<R, DynError> + Send + Sync + 'static,
    {
        let call: MethodFn = Arc::new(move |receiver: &Instance, args: &Arguments| {
            let this = receiver
                .downcast::<T>()
                .map_err(|actual_type| ArgumentError::Mismatch {
                    parameter: "self".to_string(),
                    required_type: std::any::type_name::<T>(),
                    actual_type,
                })?;
            method(&*this, args).map(Instance::new)
        });

        Method {
            name: name.into(),
            parameters,
            call,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// A free function or closure the container can invoke
#[derive(Clone)]
pub struct Callable {
    pub(crate) name: Cow<'static, str>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) call: BuildFn,
}

impl Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Callable {
    /// A named free function - add it to the catalog to call it by name
    pub fn function<R, F>(name: impl Into<Cow<'static, str>>, parameters: Vec<Parameter>, function: F) -> Self
    where
        R: Injectable,
        F: Fn(&Arguments) -> Result<R, DynError> + Send + Sync + 'static,
    {
        Callable {
            name: name.into(),
            parameters,
            call: Arc::new(move |args: &Arguments| function(args).map(Instance::new)),
        }
    }

    /// An anonymous closure
    pub fn closure<R, F>(parameters: Vec<Parameter>, closure: F) -> Self
    where
        R: Injectable,
        F: Fn(&Arguments) -> Result<R, DynError> + Send + Sync + 'static,
    {
        Self::function("{closure}", parameters, closure)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}
