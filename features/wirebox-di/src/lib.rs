//! Wirebox DI constructs types and calls functions by injecting their parameters.
//!
//! Rust has no runtime reflection, so everything the container builds is described up front:
//! types implement [Describe] (or get a [TypeDescriptor]), callables are wrapped in a [Callable]
//! or a [Method]. Each description lists its [Parameter]s - name, declared type, default and
//! whether null is allowed.
//!
//! A parameter is filled from, in order: a registered singleton of its type, a binding of its
//! type, construction of its type, a binding of its name (builtin parameters only), its default,
//! or null. Callers can override parameters per call, dotted keys reach into dependencies.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use wirebox_di::{Arguments, Container, Describe, DynError, Parameter, Parameters};
//!
//! #[derive(Default)]
//! struct Clock;
//!
//! struct Greeter {
//!     clock: Arc<Clock>,
//!     name: String,
//! }
//!
//! impl Describe for Greeter {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![
//!             Parameter::class::<Clock>("clock"),
//!             Parameter::builtin::<String>("name"),
//!         ]
//!     }
//!
//!     fn construct(args: &Arguments) -> Result<Self, DynError> {
//!         Ok(Greeter {
//!             clock: args.get("clock")?,
//!             name: args.cloned("name")?,
//!         })
//!     }
//! }
//!
//! let container = Container::builder()
//!     .describe::<Greeter>()
//!     .describe_with(wirebox_di::TypeDescriptor::implicit::<Clock>())
//!     .bind_value("name", String::from("Bob"))
//!     .build();
//!
//! let greeter = container.make_as::<Greeter>().unwrap();
//! assert_eq!(greeter.name, "Bob");
//!
//! let greeter = container
//!     .make_with(
//!         wirebox_di::Identifier::of::<Greeter>(),
//!         &Parameters::new().with("name", String::from("Suzie")),
//!     )
//!     .unwrap();
//! assert_eq!(greeter.downcast::<Greeter>().unwrap().name, "Suzie");
//! ```

pub mod arguments;
pub mod binding;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod errors;
pub mod global;
pub mod invoker;
pub mod overrides;
pub mod resolver;
pub mod types;

pub use arguments::Arguments;
pub use binding::{BindingTable, Concrete};
pub use builder::ContainerBuilder;
pub use catalog::Catalog;
pub use config::ContainerConfig;
pub use container::Container;
pub use descriptor::{Callable, Describe, Method, ParamType, Parameter, TypeDescriptor, TypeKind};
pub use errors::{ArgumentError, ContainerError, Unresolvable};
pub use global::{get_instance, set_instance};
pub use invoker::{BoundMethod, CallTarget, Invoker};
pub use overrides::{explode, Exploded, Override, Parameters};
pub use types::{DynError, Identifier, Injectable, Instance, TypeInfo};
