use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    container::Container,
    types::{DynError, Identifier, Injectable, Instance},
};

pub(crate) type FactoryFn = Arc<dyn Fn(&Container) -> Result<Instance, DynError> + Send + Sync>;

/// What an identifier is bound to
#[derive(Clone)]
pub enum Concrete {
    /// Construct this type instead
    Type(Identifier),
    /// Always return this value
    Value(Instance),
    /// Call the factory with the container
    Factory(FactoryFn),
}

impl Concrete {
    pub fn type_of<T: 'static + ?Sized>() -> Self {
        Concrete::Type(Identifier::of::<T>())
    }

    pub fn value<T: Injectable>(value: T) -> Self {
        Concrete::Value(Instance::new(value))
    }

    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Injectable,
        F: Fn(&Container) -> Result<T, DynError> + Send + Sync + 'static,
    {
        Concrete::Factory(Arc::new(move |container: &Container| factory(container).map(Instance::new)))
    }
}

impl Debug for Concrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concrete::Type(identifier) => f.debug_tuple("Type").field(identifier).finish(),
            Concrete::Value(instance) => f.debug_tuple("Value").field(instance).finish(),
            Concrete::Factory(_) => f.write_str("Factory"),
        }
    }
}

impl From<Identifier> for Concrete {
    fn from(value: Identifier) -> Self {
        Concrete::Type(value)
    }
}

impl From<Instance> for Concrete {
    fn from(value: Instance) -> Self {
        Concrete::Value(value)
    }
}

/// Abstract identifiers mapped to their concrete source - last write wins
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    binds: HashMap<Identifier, Concrete>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds and returns the previous binding, if any
    pub fn bind(&mut self, abstract_id: Identifier, concrete: Concrete) -> Option<Concrete> {
        self.binds.insert(abstract_id, concrete)
    }

    pub fn contains(&self, abstract_id: &str) -> bool {
        self.binds.contains_key(abstract_id)
    }

    pub fn get(&self, abstract_id: &str) -> Option<&Concrete> {
        self.binds.get(abstract_id)
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    pub fn clear(&mut self) {
        self.binds.clear();
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.binds.keys()
    }
}
