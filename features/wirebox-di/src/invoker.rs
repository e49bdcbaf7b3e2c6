use std::borrow::Cow;

use crate::{
    container::Container,
    descriptor::{Callable, Method, Parameter},
    errors::ContainerError,
    overrides::Parameters,
    types::{Identifier, Instance},
};

/// An instance paired with the name of a method to call on it
///
/// Without a method name the caller's default method is used.
#[derive(Debug, Clone)]
pub struct BoundMethod {
    pub receiver: Instance,
    pub method: Option<Cow<'static, str>>,
}

impl BoundMethod {
    pub fn new(receiver: impl Into<Instance>, method: impl Into<Cow<'static, str>>) -> Self {
        BoundMethod {
            receiver: receiver.into(),
            method: Some(method.into()),
        }
    }

    /// Calls the default method of the receiver
    pub fn default_method(receiver: impl Into<Instance>) -> Self {
        BoundMethod {
            receiver: receiver.into(),
            method: None,
        }
    }
}

/// Something [Container::call] can invoke
#[derive(Debug, Clone)]
pub enum CallTarget {
    /// A function added to the catalog, referenced by name
    Function(Cow<'static, str>),
    Closure(Callable),
    Method(BoundMethod),
    /// A type-erased value - must hold a [Callable], a [BoundMethod] or a function name
    Value(Instance),
}

impl From<Callable> for CallTarget {
    fn from(value: Callable) -> Self {
        CallTarget::Closure(value)
    }
}

impl From<BoundMethod> for CallTarget {
    fn from(value: BoundMethod) -> Self {
        CallTarget::Method(value)
    }
}

impl From<&'static str> for CallTarget {
    fn from(value: &'static str) -> Self {
        CallTarget::Function(Cow::Borrowed(value))
    }
}

impl From<Instance> for CallTarget {
    fn from(value: Instance) -> Self {
        CallTarget::Value(value)
    }
}

enum Target {
    Callable(Callable),
    Method { receiver: Instance, method: Method },
}

/// A call target bound to a container, ready to be invoked with injected arguments
pub struct Invoker<'c> {
    container: &'c Container,
    target: Target,
}

impl<'c> Invoker<'c> {
    /// Fails with [ContainerError::InvalidInvocationTarget] if the target can not be called
    pub fn new(
        container: &'c Container,
        target: CallTarget,
        default_method: &str,
    ) -> Result<Self, ContainerError> {
        let target = match target {
            CallTarget::Function(name) => Self::function(container, &name)?,
            CallTarget::Closure(callable) => Target::Callable(callable),
            CallTarget::Method(bound) => Self::method(container, bound, default_method)?,
            CallTarget::Value(value) => Self::value(container, value, default_method)?,
        };

        Ok(Invoker { container, target })
    }

    fn function(container: &Container, name: &str) -> Result<Target, ContainerError> {
        container
            .0
            .catalog
            .read()
            .function(name)
            .map(Target::Callable)
            .ok_or_else(|| {
                ContainerError::InvalidInvocationTarget(format!("unknown function `{name}`"))
            })
    }

    fn method(
        container: &Container,
        bound: BoundMethod,
        default_method: &str,
    ) -> Result<Target, ContainerError> {
        let BoundMethod { receiver, method } = bound;
        let name = method.as_deref().unwrap_or(default_method);

        let method = container
            .0
            .catalog
            .read()
            .get_by_type(receiver.info.type_id)
            .and_then(|descriptor| descriptor.method(name).cloned())
            .ok_or_else(|| {
                ContainerError::InvalidInvocationTarget(format!(
                    "{} has no method `{name}`",
                    receiver.info
                ))
            })?;

        Ok(Target::Method { receiver, method })
    }

    fn value(
        container: &Container,
        value: Instance,
        default_method: &str,
    ) -> Result<Target, ContainerError> {
        if let Ok(callable) = value.downcast::<Callable>() {
            return Ok(Target::Callable((*callable).clone()));
        }
        if let Ok(bound) = value.downcast::<BoundMethod>() {
            return Self::method(container, (*bound).clone(), default_method);
        }
        if let Ok(name) = value.downcast::<String>() {
            return Self::function(container, &name);
        }
        if let Ok(name) = value.downcast::<&'static str>() {
            return Self::function(container, &name);
        }

        Err(ContainerError::InvalidInvocationTarget(
            value.type_name().to_string(),
        ))
    }

    pub fn parameters(&self) -> &[Parameter] {
        match &self.target {
            Target::Callable(callable) => &callable.parameters,
            Target::Method { method, .. } => &method.parameters,
        }
    }

    /// Resolves all parameters not given in `overrides`, then calls the target
    pub fn invoke(&self, overrides: &Parameters) -> Result<Instance, ContainerError> {
        let args = self
            .container
            .method_dependencies(self.parameters(), overrides)?;

        match &self.target {
            Target::Callable(callable) => {
                tracing::debug!("Calling {} with {} arguments", callable.name, args.len());
                (callable.call)(&args).map_err(|error| {
                    ContainerError::from_user(&Identifier::new(callable.name.clone()), error)
                })
            }
            Target::Method { receiver, method } => {
                tracing::debug!(
                    "Calling {}::{} with {} arguments",
                    receiver.info,
                    method.name,
                    args.len()
                );
                (method.call)(receiver, &args).map_err(|error| {
                    ContainerError::from_user(&Identifier::from(receiver.info), error)
                })
            }
        }
    }
}

impl Container {
    /// Calls a function, closure or bound method with injected arguments
    pub fn call(&self, target: impl Into<CallTarget>) -> Result<Instance, ContainerError> {
        self.call_with(target, &Parameters::new())
    }

    /// Calls with the given arguments, the remaining ones are injected
    pub fn call_with(
        &self,
        target: impl Into<CallTarget>,
        overrides: &Parameters,
    ) -> Result<Instance, ContainerError> {
        let default_method = self.0.config.default_method.clone();
        self.call_with_default(target, overrides, &default_method)
    }

    /// Like [Container::call_with], with the method used for bound methods without a method name
    pub fn call_with_default(
        &self,
        target: impl Into<CallTarget>,
        overrides: &Parameters,
        default_method: &str,
    ) -> Result<Instance, ContainerError> {
        Invoker::new(self, target.into(), default_method)?.invoke(overrides)
    }
}
