use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};

use crate::{
    binding::{BindingTable, Concrete},
    builder::ContainerBuilder,
    catalog::Catalog,
    config::ContainerConfig,
    descriptor::{Callable, Describe, TypeDescriptor},
    errors::ContainerError,
    global,
    types::{DynError, Identifier, Injectable, Instance},
};

/// Dependency injection container
///
/// A cheap to clone handle - all clones share the same bindings, registered instances and catalog.
#[derive(Clone)]
pub struct Container(pub(crate) Arc<ContainerInner>);
pub struct ContainerInner {
    pub(crate) catalog: RwLock<Catalog>,
    pub(crate) state: Mutex<ContainerState>,
    pub(crate) config: ContainerConfig,
}

/// Everything a flush clears - kept behind one lock so a flush is atomic
#[derive(Default)]
pub(crate) struct ContainerState {
    pub(crate) bindings: BindingTable,
    /// Registered singletons
    pub(crate) instances: HashMap<Identifier, Instance>,
    /// Identifiers resolved at least once without being registered
    pub(crate) resolved: HashSet<Identifier>,
}

impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.0.state.lock();
        let mut map = f.debug_struct("Container");
        for identifier in state.bindings.identifiers() {
            map.field(identifier.as_str(), &"bound");
        }
        for identifier in state.instances.keys() {
            map.field(identifier.as_str(), &"registered");
        }
        for identifier in &state.resolved {
            map.field(identifier.as_str(), &"resolved");
        }
        map.finish()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// An empty container without any described types
    pub fn new() -> Self {
        Self::from_parts(Catalog::new(), ContainerState::default(), ContainerConfig::default())
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(catalog: Catalog, state: ContainerState, config: ContainerConfig) -> Self {
        Self(Arc::new(ContainerInner {
            catalog: RwLock::new(catalog),
            state: Mutex::new(state),
            config,
        }))
    }

    /// The process wide container, created on first access
    pub fn get_instance() -> Container {
        global::get_instance()
    }

    /// Replaces the process wide container, returning it for chaining
    pub fn set_instance(container: Container) -> Container {
        global::set_instance(container)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.0.config
    }

    /// Returns true if both handles point to the same container
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Catalog access
impl Container {
    pub fn describe(&self, descriptor: TypeDescriptor) {
        tracing::debug!("Describing {}", descriptor.identifier());
        self.0.catalog.write().describe(descriptor);
    }

    pub fn describe_type<T: Describe>(&self) {
        self.describe(TypeDescriptor::of::<T>());
    }

    pub fn add_function(&self, function: Callable) {
        tracing::debug!("Adding function {}", function.name());
        self.0.catalog.write().add_function(function);
    }

    pub fn descriptor(&self, identifier: impl Into<Identifier>) -> Option<Arc<TypeDescriptor>> {
        self.0.catalog.read().get(identifier.into().as_str())
    }
}

// Bindings, registered instances and lookups
impl Container {
    /// Binds a concrete source to an abstract identifier, replacing any previous binding
    pub fn bind(&self, abstract_id: impl Into<Identifier>, concrete: impl Into<Concrete>) {
        let abstract_id = abstract_id.into();
        let concrete = concrete.into();
        tracing::debug!("Binding {} to {:?}", abstract_id, concrete);
        self.0.state.lock().bindings.bind(abstract_id, concrete);
    }

    /// Binds an interface or type to another type, e.g. `bind_type::<dyn Service, ServiceImpl>()`
    pub fn bind_type<A: 'static + ?Sized, C: 'static + ?Sized>(&self) {
        self.bind(Identifier::of::<A>(), Concrete::type_of::<C>());
    }

    /// Binds a literal value - also used for primitive parameters bound by name
    pub fn bind_value<T: Injectable>(&self, abstract_id: impl Into<Identifier>, value: T) {
        self.bind(abstract_id, Concrete::value(value));
    }

    pub fn bind_factory<T, F>(&self, abstract_id: impl Into<Identifier>, factory: F)
    where
        T: Injectable,
        F: Fn(&Container) -> Result<T, DynError> + Send + Sync + 'static,
    {
        self.bind(abstract_id, Concrete::factory(factory));
    }

    pub fn has_bind(&self, abstract_id: impl Into<Identifier>) -> bool {
        self.0.state.lock().bindings.contains(abstract_id.into().as_str())
    }

    /// Registers a singleton, replacing any previous registration
    ///
    /// Pass an `Arc<T>` to keep a handle on the very same instance.
    pub fn register(&self, identifier: impl Into<Identifier>, instance: impl Into<Instance>) {
        let identifier = identifier.into();
        let instance = instance.into();
        tracing::debug!("Registering {} as {}", instance.info, identifier);
        self.0.state.lock().instances.insert(identifier, instance);
    }

    pub fn is_registered(&self, identifier: impl Into<Identifier>) -> bool {
        self.0.state.lock().instances.contains_key(&identifier.into())
    }

    /// True if the identifier is registered, bound, or has been resolved before
    pub fn has(&self, identifier: impl Into<Identifier>) -> bool {
        let identifier = identifier.into();
        let state = self.0.state.lock();
        state.instances.contains_key(&identifier)
            || state.resolved.contains(&identifier)
            || state.bindings.contains(identifier.as_str())
    }

    /// Returns the registered instance, or resolves the identifier if it is known to the container
    pub fn get(&self, identifier: impl Into<Identifier>) -> Result<Instance, ContainerError> {
        let identifier = identifier.into();
        if !self.has(&identifier) {
            return Err(ContainerError::NotFound(identifier));
        }

        self.resolve(identifier)
    }

    /// Forgets all bindings, registered instances and resolutions
    pub fn flush(&self) {
        let mut state = self.0.state.lock();
        tracing::debug!(
            "Flushing {} bindings, {} instances and {} resolutions",
            state.bindings.len(),
            state.instances.len(),
            state.resolved.len()
        );
        state.bindings.clear();
        state.instances.clear();
        state.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_covers_bound_registered_and_resolved() {
        let container = Container::new();
        container.bind_value("name", String::from("Bob"));
        container.register("config", Instance::new(1_u8));

        assert!(container.has("name"));
        assert!(container.has("config"));
        assert!(container.has_bind("name"));
        assert!(container.is_registered("config"));
        assert!(!container.is_registered("name"));
        assert!(!container.has("missing"));
    }

    #[test]
    fn get_unknown_is_not_found() {
        let container = Container::new();
        let error = container.get("does not exist").unwrap_err();
        assert!(matches!(error, ContainerError::NotFound(_)));
        assert!(error.is_not_found());
    }

    #[test]
    fn clones_share_state() {
        let container = Container::new();
        let clone = container.clone();
        clone.bind_value("answer", 42_i64);

        assert!(container.has_bind("answer"));
        assert!(container.ptr_eq(&clone));

        container.flush();
        assert!(!clone.has("answer"));
    }
}
