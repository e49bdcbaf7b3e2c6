//! Resolution of identifiers and parameters
//!
//! A parameter is resolved from the first source that applies:
//! 1. a registered instance of its type
//! 2. a binding of its type
//! 3. constructing its type
//! 4. a binding of its name, for builtin and untyped parameters only
//! 5. its default value
//! 6. null, if the parameter allows it

use std::{any::TypeId, cell::Cell, sync::Arc};

use crate::{
    arguments::Arguments,
    binding::Concrete,
    container::Container,
    descriptor::{Constructor, ParamType, Parameter, TypeKind},
    errors::{ArgumentError, ContainerError, Unresolvable},
    overrides::{explode, Parameters},
    types::{Identifier, Injectable, Instance},
};

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Tracks how deep `make` calls are nested on this thread, including calls made from factories
struct DepthGuard;

impl DepthGuard {
    fn enter(identifier: &Identifier, limit: usize) -> Result<Self, ContainerError> {
        let depth = DEPTH.with(|depth| depth.get());
        if depth >= limit {
            tracing::error!("Resolving {} exceeded the maximum depth of {}", identifier, limit);
            return Err(ContainerError::RecursionLimit {
                identifier: identifier.clone(),
                limit,
            });
        }
        DEPTH.with(|current| current.set(depth + 1));
        Ok(DepthGuard)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl Container {
    /// Makes a new instance, ignoring registered singletons
    pub fn make(&self, identifier: impl Into<Identifier>) -> Result<Instance, ContainerError> {
        self.make_with(identifier, &Parameters::new())
    }

    /// Makes a new instance with parameter overrides
    ///
    /// Overrides are keyed by parameter name. Dotted keys are forwarded to dependencies,
    /// `"child.local"` overrides the `local` parameter of the dependency injected as `child`.
    pub fn make_with(
        &self,
        identifier: impl Into<Identifier>,
        overrides: &Parameters,
    ) -> Result<Instance, ContainerError> {
        let identifier = identifier.into();
        let _depth = DepthGuard::enter(&identifier, self.0.config.max_depth)?;

        let descriptor = self.0.catalog.read().get(identifier.as_str());
        let Some(descriptor) = descriptor else {
            if self.has_bind(&identifier) {
                tracing::trace!("{} is not described - using its binding", identifier);
                return self.resolve_bind(&identifier);
            }
            return Err(ContainerError::unresolvable(identifier, Unresolvable::UnknownType));
        };

        match &descriptor.kind {
            TypeKind::Interface(interface) => {
                if !self.has_bind(&identifier) {
                    return Err(ContainerError::unresolvable(
                        identifier,
                        Unresolvable::UnboundInterface,
                    ));
                }
                let instance = self.resolve_bind(&identifier)?;
                Ok(interface.conform(instance))
            }
            TypeKind::Abstract => Err(ContainerError::unresolvable(
                identifier,
                Unresolvable::NotInstantiable,
            )),
            TypeKind::Concrete(constructor) => self.construct(&identifier, constructor, overrides),
        }
    }

    /// Typed [Container::make] - `T` is looked up under the identifier it was described with
    pub fn make_as<T: Injectable>(&self) -> Result<Arc<T>, ContainerError> {
        let identifier = self.identifier_of::<T>();
        let instance = self.make(&identifier)?;
        downcast_resolved(&identifier, instance)
    }

    /// Returns the registered singleton, or makes a new instance if there is none
    pub fn resolve(&self, identifier: impl Into<Identifier>) -> Result<Instance, ContainerError> {
        self.resolve_with(identifier, &Parameters::new())
    }

    /// Like [Container::resolve] - but any overrides, even empty values, force a new instance
    ///
    /// New instances are never registered as singletons.
    pub fn resolve_with(
        &self,
        identifier: impl Into<Identifier>,
        overrides: &Parameters,
    ) -> Result<Instance, ContainerError> {
        let identifier = identifier.into();

        if overrides.is_empty() {
            let registered = self.0.state.lock().instances.get(&identifier).cloned();
            if let Some(instance) = registered {
                tracing::trace!("Resolved {} from the registry", identifier);
                return Ok(instance);
            }
        }

        let instance = self.make_with(&identifier, overrides)?;
        self.0.state.lock().resolved.insert(identifier);
        Ok(instance)
    }

    /// Typed [Container::resolve]
    pub fn resolve_as<T: Injectable>(&self) -> Result<Arc<T>, ContainerError> {
        let identifier = self.identifier_of::<T>();
        let instance = self.resolve(&identifier)?;
        downcast_resolved(&identifier, instance)
    }

    /// Resolves the arguments for a parameter list
    ///
    /// A parameter named in `overrides` takes that value, everything else is resolved.
    /// Keys are used as they are - no dotted forwarding.
    pub fn method_dependencies(
        &self,
        parameters: &[Parameter],
        overrides: &Parameters,
    ) -> Result<Arguments, ContainerError> {
        let mut args = Arguments::new();
        for parameter in parameters {
            let value = match overrides.get(parameter.name()) {
                Some(value) => Some(value.clone()),
                None => self.resolve_dependency(parameter, &Parameters::new())?,
            };
            args.insert(parameter.name(), value);
        }
        Ok(args)
    }

    fn construct(
        &self,
        identifier: &Identifier,
        constructor: &Constructor,
        overrides: &Parameters,
    ) -> Result<Instance, ContainerError> {
        let Some(parameters) = &constructor.parameters else {
            tracing::debug!("Constructing {} without a constructor", identifier);
            return (constructor.build)(&Arguments::new())
                .map_err(|error| ContainerError::from_user(identifier, error));
        };

        let exploded = explode(overrides);
        if !exploded.is_empty() {
            tracing::trace!("Routing {} overrides into {}", exploded.len(), identifier);
        }
        let mut args = Arguments::new();
        for parameter in parameters {
            let value = match exploded.direct(parameter.name()) {
                Some(value) => Some(value.clone()),
                None => self.resolve_dependency(parameter, &exploded.nested(parameter.name()))?,
            };
            args.insert(parameter.name(), value);
        }

        tracing::debug!("Constructing {} with {} arguments", identifier, args.len());
        (constructor.build)(&args).map_err(|error| ContainerError::from_user(identifier, error))
    }

    /// Resolves a single parameter - `Ok(None)` is a resolved null
    pub(crate) fn resolve_dependency(
        &self,
        parameter: &Parameter,
        overrides: &Parameters,
    ) -> Result<Option<Instance>, ContainerError> {
        let resolved = match parameter.class_identifier() {
            Some(class) => self.resolve_class(class, overrides)?,
            None => self.resolve_by_name(parameter)?,
        };
        if resolved.is_some() {
            return Ok(resolved);
        }

        if let Some(default) = parameter.default_value() {
            tracing::trace!("Using the default of parameter {}", parameter.name());
            return Ok(Some(default.clone()));
        }

        if parameter.allows_null() {
            tracing::trace!("Using null for parameter {}", parameter.name());
            return Ok(None);
        }

        let identifier = match parameter.ty() {
            ParamType::Class(class) => class.clone(),
            ParamType::Builtin(type_name) => Identifier::from(*type_name),
            ParamType::Untyped => Identifier::new(parameter.name().to_string()),
        };
        Err(ContainerError::unresolvable(
            identifier,
            Unresolvable::Parameter(parameter.name().to_string()),
        ))
    }

    /// Registry, binding, then construction of a class typed parameter
    fn resolve_class(
        &self,
        class: &Identifier,
        overrides: &Parameters,
    ) -> Result<Option<Instance>, ContainerError> {
        let (registered, bound) = {
            let state = self.0.state.lock();
            (
                state.instances.contains_key(class),
                state.bindings.contains(class.as_str()),
            )
        };

        if registered {
            tracing::trace!("Resolving {} through the registry", class);
            return self.resolve_with(class, overrides).map(Some);
        }

        if bound {
            tracing::trace!("Resolving {} through its binding", class);
            let instance = self.resolve_bind(class)?;
            return Ok(Some(self.conform(class, instance)));
        }

        if self.0.catalog.read().contains(class.as_str()) {
            tracing::trace!("Resolving {} by construction", class);
            return self.make_with(class, overrides).map(Some);
        }

        Ok(None)
    }

    /// Builtin and untyped parameters can be bound by their name
    ///
    /// The name binding is produced like any other, a type is constructed and a factory is invoked.
    fn resolve_by_name(&self, parameter: &Parameter) -> Result<Option<Instance>, ContainerError> {
        let name = Identifier::new(parameter.name().to_string());
        if !self.has_bind(&name) {
            return Ok(None);
        }

        tracing::trace!("Resolving parameter {} through its name binding", name);
        self.resolve_bind(&name).map(Some)
    }

    /// Produces the value of a binding
    pub(crate) fn resolve_bind(&self, abstract_id: &Identifier) -> Result<Instance, ContainerError> {
        let concrete = self
            .0
            .state
            .lock()
            .bindings
            .get(abstract_id.as_str())
            .cloned()
            .ok_or_else(|| ContainerError::BindNotFound(abstract_id.clone()))?;

        match concrete {
            Concrete::Type(target) => self.make(target),
            Concrete::Factory(factory) => {
                factory(self).map_err(|error| ContainerError::from_user(abstract_id, error))
            }
            Concrete::Value(instance) => Ok(instance),
        }
    }

    /// Conforms a value produced for an interface to its `Arc<dyn Trait>` representation
    fn conform(&self, identifier: &Identifier, instance: Instance) -> Instance {
        match self.0.catalog.read().get(identifier.as_str()) {
            Some(descriptor) => match &descriptor.kind {
                TypeKind::Interface(interface) => interface.conform(instance),
                _ => instance,
            },
            None => instance,
        }
    }

    fn identifier_of<T: Injectable>(&self) -> Identifier {
        self.0
            .catalog
            .read()
            .get_by_type(TypeId::of::<T>())
            .map(|descriptor| descriptor.identifier.clone())
            .unwrap_or_else(Identifier::of::<T>)
    }
}

fn downcast_resolved<T: Injectable>(
    identifier: &Identifier,
    instance: Instance,
) -> Result<Arc<T>, ContainerError> {
    instance.downcast::<T>().map_err(|actual_type| {
        ArgumentError::Mismatch {
            parameter: identifier.to_string(),
            required_type: std::any::type_name::<T>(),
            actual_type,
        }
        .into()
    })
}
