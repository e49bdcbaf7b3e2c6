use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, Identifier};

/// Errors raised by the container
#[derive(Error, Debug, Clone)]
pub enum ContainerError {
    /// Nothing is registered, bound or resolved under the identifier
    #[error("No entry was found for '{0}'")]
    NotFound(Identifier),
    /// A concrete binding was expected but does not exist
    #[error("A concrete binding was not found for '{0}'")]
    BindNotFound(Identifier),
    /// No resolution strategy produced a value
    #[error("Cannot resolve dependency '{identifier}': {reason}")]
    UnresolvableDependency {
        identifier: Identifier,
        reason: Unresolvable,
    },
    /// The call target is not a function, closure or bound method
    #[error("Expected closure, function, or bound method; received {0}")]
    InvalidInvocationTarget(String),
    /// A constructor or callable read one of its arguments incorrectly
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// A constructor, factory or callable returned an error of its own
    #[error("Constructing '{identifier}' failed - error: {error}")]
    ConstructionFailed {
        identifier: Identifier,
        error: Arc<DynError>,
    },
    /// Resolution nested deeper than the configured limit, most likely a cycle
    #[error("Resolving '{identifier}' exceeded the maximum depth of {limit}")]
    RecursionLimit { identifier: Identifier, limit: usize },
}

impl ContainerError {
    /// True for [ContainerError::NotFound] and its special case [ContainerError::BindNotFound]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::BindNotFound(_))
    }

    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::UnresolvableDependency { .. })
    }

    pub(crate) fn unresolvable(identifier: impl Into<Identifier>, reason: Unresolvable) -> Self {
        Self::UnresolvableDependency {
            identifier: identifier.into(),
            reason,
        }
    }

    /// Errors coming back from user code keep their kind if they originated in the container
    pub(crate) fn from_user(identifier: &Identifier, error: DynError) -> Self {
        match error.downcast::<ContainerError>() {
            Ok(container_error) => *container_error,
            Err(error) => match error.downcast::<ArgumentError>() {
                Ok(argument_error) => Self::Argument(*argument_error),
                Err(error) => Self::ConstructionFailed {
                    identifier: identifier.clone(),
                    error: Arc::new(error),
                },
            },
        }
    }
}

/// Why a dependency could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unresolvable {
    #[error("the interface has no binding")]
    UnboundInterface,
    #[error("the type is not instantiable")]
    NotInstantiable,
    #[error("the type is not described and has no binding")]
    UnknownType,
    #[error("parameter '{0}' has no binding, default or null fallback")]
    Parameter(String),
}

/// Errors when reading a resolved argument
#[derive(Error, Debug, Clone)]
pub enum ArgumentError {
    #[error("Argument '{0}' was not supplied")]
    Missing(String),
    #[error("Argument '{0}' is null")]
    Null(String),
    #[error("Argument '{parameter}' has the wrong type, required: '{required_type}' actual: '{actual_type}'")]
    Mismatch {
        parameter: String,
        required_type: &'static str,
        actual_type: &'static str,
    },
}
