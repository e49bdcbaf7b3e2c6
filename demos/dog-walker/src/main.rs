use std::sync::Arc;

use wirebox_di::{
    Arguments, BoundMethod, Container, ContainerError, Describe, DynError, Identifier, Method,
    Parameter, Parameters, TypeDescriptor,
};

trait Fetchable: Send + Sync {
    fn name(&self) -> &'static str;
}

#[derive(Default)]
struct Stick;
impl Fetchable for Stick {
    fn name(&self) -> &'static str {
        "stick"
    }
}

#[derive(Default)]
struct Ball;
impl Fetchable for Ball {
    fn name(&self) -> &'static str {
        "ball"
    }
}

struct Nametag {
    name: String,
    #[allow(dead_code)]
    id: i64,
}

impl Describe for Nametag {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::builtin::<String>("name"),
            Parameter::builtin::<i64>("id"),
        ]
    }

    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Nametag {
            name: args.cloned("name")?,
            id: args.cloned("id")?,
        })
    }
}

#[derive(Default)]
struct DogWalker;

impl DogWalker {
    const DEFAULT_MINUTES: i64 = 30;

    fn take_dog(&self, dog: &Dog, minutes: i64) -> String {
        format!("I am taking {} for a walk for {} minutes", dog.name(), minutes)
    }

    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::implicit::<DogWalker>().with_method(Method::new(
            "take_dog",
            vec![
                Parameter::class::<Dog>("dog"),
                Parameter::builtin::<i64>("minutes").with_default(Self::DEFAULT_MINUTES),
            ],
            |walker: &DogWalker, args: &Arguments| {
                let dog = args.get::<Dog>("dog")?;
                Ok(walker.take_dog(&dog, args.cloned("minutes")?))
            },
        ))
    }
}

struct Dog {
    nametag: Arc<Nametag>,
}

impl Dog {
    fn name(&self) -> &str {
        &self.nametag.name
    }
}

impl Describe for Dog {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::class::<Nametag>("nametag")]
    }

    fn construct(args: &Arguments) -> Result<Self, DynError> {
        Ok(Dog {
            nametag: args.get("nametag")?,
        })
    }

    fn methods() -> Vec<Method> {
        vec![
            Method::new(
                "fetch",
                vec![Parameter::class::<dyn Fetchable>("fetchable")],
                |dog: &Dog, args: &Arguments| {
                    let fetchable = args.interface::<dyn Fetchable>("fetchable")?;
                    Ok(format!("{} fetched a {}", dog.name(), fetchable.name()))
                },
            ),
            Method::new(
                "walk",
                vec![Parameter::class::<DogWalker>("dog_walker")],
                |dog: &Dog, args: &Arguments| {
                    let walker = args.get::<DogWalker>("dog_walker")?;
                    Ok(walker.take_dog(dog, DogWalker::DEFAULT_MINUTES))
                },
            ),
        ]
    }
}

fn announce(result: wirebox_di::Instance) -> Result<(), ContainerError> {
    let line = result.downcast::<String>().map_err(|actual_type| {
        wirebox_di::ArgumentError::Mismatch {
            parameter: "result".to_string(),
            required_type: "String",
            actual_type,
        }
    })?;
    println!("{line}");
    Ok(())
}

fn main() -> Result<(), ContainerError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let container = Container::set_instance(
        Container::builder()
            .describe::<Dog>()
            .describe::<Nametag>()
            .describe_with(DogWalker::descriptor())
            .describe_with(TypeDescriptor::implicit::<Stick>())
            .describe_with(TypeDescriptor::implicit::<Ball>())
            .describe_with(
                TypeDescriptor::interface::<dyn Fetchable>()
                    .implemented_by::<dyn Fetchable, Stick>(|stick| stick)
                    .implemented_by::<dyn Fetchable, Ball>(|ball| ball),
            )
            .build(),
    );

    // anything holding the global handle sees the same bindings
    let global = Container::get_instance();
    global.bind_type::<dyn Fetchable, Stick>();
    global.bind_value(
        Identifier::of::<Nametag>(),
        Nametag {
            name: String::from("Jack"),
            id: 739481,
        },
    );

    let dog = container.resolve_as::<Dog>()?;
    tracing::info!("Resolved a dog named {}", dog.name());

    // Jack fetched a stick
    announce(container.call(BoundMethod::new(dog.clone(), "fetch"))?)?;

    // I am taking Jack for a walk for 30 minutes
    announce(container.call(BoundMethod::new(dog.clone(), "walk"))?)?;

    // a direct override replaces the dependency, minutes keeps its default
    let walker = container.make_as::<DogWalker>()?;
    announce(container.call_with(
        BoundMethod::new(walker, "take_dog"),
        &Parameters::new().with_instance("dog", dog.clone()),
    )?)?;

    container.bind_type::<dyn Fetchable, Ball>();
    announce(container.call_with(
        BoundMethod::new(dog, "fetch"),
        &Parameters::new(),
    )?)?;

    Ok(())
}
