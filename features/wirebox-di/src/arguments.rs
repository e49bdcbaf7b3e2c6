use std::{any::type_name, collections::HashMap, sync::Arc};

use crate::{
    errors::ArgumentError,
    types::{Injectable, Instance},
};

/// Name-keyed arguments for a constructor, function or method
///
/// `None` values are resolved nulls.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: HashMap<String, Option<Instance>>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Option<Instance>) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The raw argument - `Ok(None)` if it resolved to null
    pub fn instance(&self, name: &str) -> Result<Option<&Instance>, ArgumentError> {
        self.values
            .get(name)
            .map(Option::as_ref)
            .ok_or_else(|| ArgumentError::Missing(name.to_string()))
    }

    /// A required argument
    pub fn get<T: Injectable>(&self, name: &str) -> Result<Arc<T>, ArgumentError> {
        self.get_optional(name)?
            .ok_or_else(|| ArgumentError::Null(name.to_string()))
    }

    /// A nullable argument
    pub fn get_optional<T: Injectable>(&self, name: &str) -> Result<Option<Arc<T>>, ArgumentError> {
        let Some(instance) = self.instance(name)? else {
            return Ok(None);
        };

        instance
            .downcast::<T>()
            .map(Some)
            .map_err(|actual_type| ArgumentError::Mismatch {
                parameter: name.to_string(),
                required_type: type_name::<T>(),
                actual_type,
            })
    }

    /// A required argument, cloned out of its shared handle - handy for primitives
    pub fn cloned<T: Injectable + Clone>(&self, name: &str) -> Result<T, ArgumentError> {
        self.get::<T>(name).map(|shared| (*shared).clone())
    }

    /// A required argument of an interface type, e.g. `args.interface::<dyn Service>("service")`
    pub fn interface<I>(&self, name: &str) -> Result<Arc<I>, ArgumentError>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.get::<Arc<I>>(name).map(|shared| (*shared).clone())
    }
}

impl FromIterator<(String, Option<Instance>)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (String, Option<Instance>)>>(iter: T) -> Self {
        Arguments {
            values: iter.into_iter().collect(),
        }
    }
}
