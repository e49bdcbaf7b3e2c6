use std::{any::TypeId, collections::HashMap, sync::Arc};

use crate::{
    descriptor::{Callable, Describe, TypeDescriptor},
    types::Identifier,
};

/// All type descriptors and named functions known to a container
///
/// The catalog is metadata - it survives a flush of the container.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: HashMap<Identifier, Arc<TypeDescriptor>>,
    /// Concrete type ids to the identifier they are described under
    by_type: HashMap<TypeId, Identifier>,
    functions: HashMap<String, Callable>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor
    pub fn describe(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        if let Some(info) = descriptor.info {
            self.by_type.insert(info.type_id, descriptor.identifier.clone());
        }
        self.types
            .insert(descriptor.identifier.clone(), Arc::new(descriptor));
        self
    }

    pub fn describe_type<T: Describe>(&mut self) -> &mut Self {
        self.describe(TypeDescriptor::of::<T>())
    }

    /// Adds a function callable by its name
    pub fn add_function(&mut self, function: Callable) -> &mut Self {
        self.functions.insert(function.name.to_string(), function);
        self
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(identifier).cloned()
    }

    /// Descriptor of the concrete type with the given id
    pub fn get_by_type(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.by_type
            .get(&type_id)
            .and_then(|identifier| self.get(identifier.as_str()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier)
    }

    pub fn function(&self, name: &str) -> Option<Callable> {
        self.functions.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{arguments::Arguments, descriptor::Parameter, types::DynError};

    #[allow(dead_code)]
    struct Lamp {
        watts: i64,
    }
    impl Describe for Lamp {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::builtin::<i64>("watts").with_default(60_i64)]
        }
        fn construct(args: &Arguments) -> Result<Self, DynError> {
            Ok(Lamp {
                watts: args.cloned("watts")?,
            })
        }
    }

    #[test]
    fn finds_descriptors_by_identifier_and_type() {
        let mut catalog = Catalog::new();
        catalog
            .describe_type::<Lamp>()
            .describe(TypeDescriptor::abstract_type("Shape"));

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(Identifier::of::<Lamp>().as_str()).is_some());
        assert!(catalog.get_by_type(TypeId::of::<Lamp>()).is_some());
        assert!(catalog.get_by_type(TypeId::of::<u8>()).is_none());
        assert!(catalog.contains("Shape"));
    }

    #[test]
    fn custom_identifiers_are_indexed_by_type() {
        let mut catalog = Catalog::new();
        catalog.describe(TypeDescriptor::of::<Lamp>().with_identifier("lamp"));

        let descriptor = catalog.get_by_type(TypeId::of::<Lamp>()).unwrap();
        assert_eq!(descriptor.identifier().as_str(), "lamp");
    }
}
