mod support;

use std::sync::Arc;

use rstest::*;
use support::*;
use wirebox_di::{
    Arguments, BoundMethod, CallTarget, Callable, Container, ContainerError, Identifier, Instance,
    Invoker, Parameter, Parameters,
};

#[fixture]
fn container() -> Container {
    support::container()
}

fn text(instance: Instance) -> String {
    instance.downcast::<&'static str>().map(|text| text.to_string()).unwrap()
}

#[rstest]
fn call_object_method(container: Container) {
    let recorder = Arc::new(Recorder::default());

    let result = container
        .call_with(
            BoundMethod::new(recorder.clone(), "record"),
            &Parameters::new().with("hello", String::from("Hello World")),
        )
        .unwrap();

    assert!(recorder.other.lock().is_some());
    assert_eq!(recorder.hello.lock().as_deref(), Some("Hello World"));
    assert_eq!(text(result), "bound method was called");
}

#[rstest]
fn call_object_method_with_registered_dependency(container: Container) {
    let recorder = Arc::new(Recorder::default());
    container.register(
        Identifier::of::<NeedsUserInput>(),
        Arc::new(NeedsUserInput {
            items: vec![String::from("yup")],
        }),
    );

    let result = container
        .call(BoundMethod::new(recorder, "configure"))
        .unwrap();
    assert_eq!(*result.downcast::<usize>().unwrap(), 1);
}

#[rstest]
fn call_object_method_without_dependency_fails(container: Container) {
    let error = container
        .call(BoundMethod::new(Arc::new(Recorder::default()), "configure"))
        .unwrap_err();
    assert!(error.is_unresolvable());
}

#[rstest]
fn call_default_method(container: Container) {
    let recorder = Arc::new(Recorder::default());

    let result = container
        .call(BoundMethod::default_method(recorder.clone()))
        .unwrap();
    assert_eq!(text(result), "default method was called");

    let result = container
        .call_with_default(
            BoundMethod::default_method(recorder),
            &Parameters::new().with("hello", String::from("explicit")),
            "record",
        )
        .unwrap();
    assert_eq!(text(result), "bound method was called");
}

#[rstest]
fn call_closure(container: Container) {
    let closure = Callable::closure(
        vec![
            Parameter::class::<Plain>("other"),
            Parameter::builtin::<String>("hello"),
        ],
        |args: &Arguments| {
            let _other = args.get::<Plain>("other")?;
            Ok(format!("closure was called: {}", args.cloned::<String>("hello")?))
        },
    );

    let result = container
        .call_with(
            closure,
            &Parameters::new().with("hello", String::from("Hello World")),
        )
        .unwrap();
    assert_eq!(
        *result.downcast::<String>().unwrap(),
        "closure was called: Hello World"
    );
}

#[rstest]
fn call_function(container: Container) {
    let result = container
        .call_with(
            "echo",
            &Parameters::new().with("message", String::from("function was called")),
        )
        .unwrap();
    assert_eq!(*result.downcast::<String>().unwrap(), "function was called");
}

#[rstest]
fn call_type_erased_targets(container: Container) {
    let result = container
        .call_with(
            Instance::new(String::from("echo")),
            &Parameters::new().with("message", String::from("by name")),
        )
        .unwrap();
    assert_eq!(*result.downcast::<String>().unwrap(), "by name");

    let bound = Instance::new(BoundMethod::default_method(Arc::new(Recorder::default())));
    let result = container.call(bound).unwrap();
    assert_eq!(text(result), "default method was called");
}

#[rstest]
fn call_uses_name_bindings_for_primitives(container: Container) {
    container.bind_value("message", String::from("bound"));

    let result = container.call("echo").unwrap();
    assert_eq!(*result.downcast::<String>().unwrap(), "bound");
}

#[rstest]
fn call_does_not_split_dotted_keys(container: Container) {
    // a dotted key never matches a parameter of the callable itself
    let error = container
        .call_with(
            "echo",
            &Parameters::new().with("message.inner", String::from("ignored")),
        )
        .unwrap_err();
    assert!(error.is_unresolvable());
}

#[rstest]
#[case::unknown_function(CallTarget::from("does_not_exist"))]
#[case::unknown_method(CallTarget::from(BoundMethod::new(Arc::new(Recorder::default()), "missing")))]
#[case::undescribed_receiver(CallTarget::from(BoundMethod::default_method(Arc::new(5_u8))))]
#[case::not_callable(CallTarget::from(Instance::new(42_i64)))]
fn invalid_targets_fail(container: Container, #[case] target: CallTarget) {
    let error = container.call(target).unwrap_err();
    assert!(matches!(error, ContainerError::InvalidInvocationTarget(_)));
}

#[rstest]
fn invalid_target_fails_before_resolution(container: Container) {
    // echo would resolve fine - the target check comes first
    let error = Invoker::new(&container, CallTarget::from(Instance::new(1.5_f64)), "invoke")
        .err()
        .unwrap();
    assert!(matches!(error, ContainerError::InvalidInvocationTarget(ref actual) if actual == "f64"));
}

#[rstest]
fn invoker_exposes_parameters(container: Container) {
    let invoker = Invoker::new(&container, CallTarget::from("echo"), "invoke").unwrap();
    let names: Vec<_> = invoker.parameters().iter().map(Parameter::name).collect();
    assert_eq!(names, ["plain", "message"]);

    let result = invoker
        .invoke(&Parameters::new().with("message", String::from("twice")))
        .unwrap();
    assert_eq!(*result.downcast::<String>().unwrap(), "twice");
}

#[rstest]
fn callable_errors_are_reported(container: Container) {
    let failing = Callable::closure(Vec::new(), |_: &Arguments| -> Result<(), wirebox_di::DynError> {
        Err("nope".into())
    });

    let error = container.call(failing).unwrap_err();
    assert!(matches!(error, ContainerError::ConstructionFailed { .. }));
}
