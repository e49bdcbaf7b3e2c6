use std::collections::HashMap;

use crate::{
    binding::{BindingTable, Concrete},
    catalog::Catalog,
    config::ContainerConfig,
    container::{Container, ContainerState},
    descriptor::{Callable, Describe, TypeDescriptor},
    types::{Identifier, Instance},
};

/// Collects descriptors, bindings and instances for a new [Container]
///
/// ```rust
/// use wirebox_di::{Container, ContainerConfig};
///
/// let container = Container::builder()
///     .bind_value("name", String::from("Bob"))
///     .with_config(ContainerConfig::default().with_max_depth(32))
///     .build();
///
/// assert!(container.has_bind("name"));
/// ```
pub struct ContainerBuilder {
    catalog: Catalog,
    bindings: BindingTable,
    /// Registered already created instances
    registered_instances: HashMap<Identifier, Instance>,
    config: ContainerConfig,
}
impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        ContainerBuilder {
            catalog: Catalog::new(),
            bindings: BindingTable::new(),
            registered_instances: HashMap::new(),
            config: ContainerConfig::default(),
        }
    }
}
impl ContainerBuilder {
    pub fn describe<T: Describe>(mut self) -> Self {
        self.catalog.describe_type::<T>();
        self
    }

    pub fn describe_with(mut self, descriptor: TypeDescriptor) -> Self {
        self.catalog.describe(descriptor);
        self
    }

    pub fn function(mut self, function: Callable) -> Self {
        self.catalog.add_function(function);
        self
    }

    pub fn bind(mut self, abstract_id: impl Into<Identifier>, concrete: impl Into<Concrete>) -> Self {
        self.bindings.bind(abstract_id.into(), concrete.into());
        self
    }

    pub fn bind_type<A: 'static + ?Sized, C: 'static + ?Sized>(self) -> Self {
        self.bind(Identifier::of::<A>(), Concrete::type_of::<C>())
    }

    pub fn bind_value<T: crate::Injectable>(self, abstract_id: impl Into<Identifier>, value: T) -> Self {
        self.bind(abstract_id, Concrete::value(value))
    }

    pub fn register(mut self, identifier: impl Into<Identifier>, instance: impl Into<Instance>) -> Self {
        self.registered_instances
            .insert(identifier.into(), instance.into());
        self
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Container {
        let ContainerBuilder {
            catalog,
            bindings,
            registered_instances,
            config,
        } = self;

        if catalog.is_empty() {
            tracing::debug!("Building a container without described types");
        }
        tracing::debug!(
            "Building container with {} types, {} bindings and {} instances",
            catalog.len(),
            bindings.len(),
            registered_instances.len()
        );

        Container::from_parts(
            catalog,
            ContainerState {
                bindings,
                instances: registered_instances,
                resolved: Default::default(),
            },
            config,
        )
    }
}
