//! Types shared by the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use wirebox_di::{
    Arguments, Callable, Container, Describe, DynError, Method, Parameter, TypeDescriptor,
};

/// No constructor at all
#[derive(Debug, Default)]
pub struct Plain;

/// Single defaulted primitive
#[derive(Debug)]
pub struct WithDefault {
    pub default: String,
}
impl Describe for WithDefault {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::builtin::<String>("default").with_default(String::from("default"))]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(WithDefault {
            default: args.cloned("default")?,
        })
    }
}

/// Depends on a type without constructor
pub struct WithDependency {
    pub other: Arc<Plain>,
}
impl Describe for WithDependency {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::class::<Plain>("other")]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(WithDependency {
            other: args.get("other")?,
        })
    }
}

/// Primitives only resolvable through name bindings or overrides
#[derive(Debug)]
pub struct WithPrimitives {
    pub name: String,
    pub age: i64,
}
impl Describe for WithPrimitives {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::builtin::<String>("name"),
            Parameter::builtin::<i64>("age"),
        ]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(WithPrimitives {
            name: args.cloned("name")?,
            age: args.cloned("age")?,
        })
    }
}

/// A dependency which itself takes parameters
pub struct Parent {
    pub other: Arc<WithDefault>,
    pub local: String,
}
impl Describe for Parent {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::class::<WithDefault>("other"),
            Parameter::builtin::<String>("local"),
        ]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Parent {
            other: args.get("other")?,
            local: args.cloned("local")?,
        })
    }
}

pub struct Grandparent {
    pub child: Arc<Parent>,
    pub local: String,
}
impl Describe for Grandparent {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::class::<Parent>("child"),
            Parameter::builtin::<String>("local"),
        ]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Grandparent {
            child: args.get("child")?,
            local: args.cloned("local")?,
        })
    }
}

/// Nullable dependency on an interface nobody binds
pub struct WithOptional {
    pub greeter: Option<Arc<dyn Greeter>>,
}
impl Describe for WithOptional {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::class::<Unknown>("greeter").nullable()]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(WithOptional {
            greeter: args
                .get_optional::<Arc<dyn Greeter>>("greeter")?
                .map(|greeter| (*greeter).clone()),
        })
    }
}

/// A type the container knows nothing about
pub struct Unknown;

pub trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Default)]
pub struct EnglishGreeter;
impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

#[derive(Default)]
pub struct GermanGreeter;
impl Greeter for GermanGreeter {
    fn greet(&self) -> String {
        "hallo".to_string()
    }
}

/// Depends on the greeter interface
pub struct Reception {
    pub greeter: Arc<dyn Greeter>,
}
impl Describe for Reception {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::class::<dyn Greeter>("greeter")]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Reception {
            greeter: args.interface("greeter")?,
        })
    }
}

/// Defaulted primitives, one of them nullable
pub struct Preferences {
    pub theme: String,
    pub language: Option<Arc<String>>,
}
impl Describe for Preferences {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::builtin::<String>("theme").with_default(String::from("light")),
            Parameter::builtin::<String>("language")
                .nullable()
                .with_default(String::from("en")),
        ]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Preferences {
            theme: args.cloned("theme")?,
            language: args.get_optional("language")?,
        })
    }
}

/// Requires a value nobody can supply
#[derive(Debug)]
pub struct NeedsUserInput {
    pub items: Vec<String>,
}
impl Describe for NeedsUserInput {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::builtin::<Vec<String>>("items")]
    }
    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(NeedsUserInput {
            items: args.cloned("items")?,
        })
    }
}

/// Records what its methods were called with
#[derive(Default)]
pub struct Recorder {
    pub other: Mutex<Option<Arc<Plain>>>,
    pub hello: Mutex<Option<String>>,
}
impl Describe for Recorder {
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }
    fn construct(_: &Arguments) -> Result<Self, DynError> {
        Ok(Recorder::default())
    }
    fn methods() -> Vec<Method> {
        vec![
            Method::new(
                "record",
                vec![
                    Parameter::class::<Plain>("other"),
                    Parameter::builtin::<String>("hello"),
                ],
                |this: &Recorder, args: &Arguments| {
                    *this.other.lock() = Some(args.get("other")?);
                    *this.hello.lock() = Some(args.cloned("hello")?);
                    Ok("bound method was called")
                },
            ),
            Method::new(
                "configure",
                vec![Parameter::class::<NeedsUserInput>("config")],
                |_: &Recorder, args: &Arguments| {
                    let config = args.get::<NeedsUserInput>("config")?;
                    Ok(config.items.len())
                },
            ),
            Method::new(
                "invoke",
                Vec::new(),
                |_: &Recorder, _: &Arguments| Ok("default method was called"),
            ),
        ]
    }
}

pub fn echo_function() -> Callable {
    Callable::function(
        "echo",
        vec![
            Parameter::class::<Plain>("plain"),
            Parameter::builtin::<String>("message"),
        ],
        |args: &Arguments| {
            args.get::<Plain>("plain")?;
            Ok(args.cloned::<String>("message")?)
        },
    )
}

/// A container describing every type above
pub fn container() -> Container {
    Container::builder()
        .describe_with(TypeDescriptor::implicit::<Plain>())
        .describe::<WithDefault>()
        .describe::<WithDependency>()
        .describe::<WithPrimitives>()
        .describe::<Parent>()
        .describe::<Grandparent>()
        .describe::<WithOptional>()
        .describe::<Reception>()
        .describe::<Preferences>()
        .describe::<NeedsUserInput>()
        .describe::<Recorder>()
        .describe_with(TypeDescriptor::implicit::<EnglishGreeter>())
        .describe_with(TypeDescriptor::implicit::<GermanGreeter>())
        .describe_with(
            TypeDescriptor::interface::<dyn Greeter>()
                .implemented_by::<dyn Greeter, EnglishGreeter>(|greeter| greeter)
                .implemented_by::<dyn Greeter, GermanGreeter>(|greeter| greeter),
        )
        .describe_with(TypeDescriptor::abstract_type("Shape"))
        .function(echo_function())
        .build()
}
