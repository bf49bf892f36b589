use std::rc::Rc;

use callable_object::{
    call,
    object::{Class, ClassHandle, Closure, DynamicDispatch, Instance, InstanceHandle, Object},
    Callable, CallableHandle, InvalidDescriptorError, Kind, NativeResult, Runtime, RuntimeRef,
    UnresolvedCallableError,
};
use pretty_assertions::assert_eq;

const FUNCTION_WITH_PARAMETERS: &str = r"Tests\Callable\testFunctionWithParameters";
const FUNCTION_WITHOUT_PARAMETERS: &str = r"Tests\Callable\testFunctionWithoutParameters";
const TEST_CLASS: &str = r"Tests\Callable\TestClass";

fn pair(arguments: Vec<Object>) -> NativeResult {
    let mut arguments = arguments.into_iter();
    Ok(Object::Array(vec![
        arguments.next().unwrap_or(Object::Nil),
        arguments.next().unwrap_or(Object::Nil),
    ]))
}

fn test_class() -> Class {
    Class::new(TEST_CLASS)
        .with_call_static_hook(|_, name, _| Ok(name.into()))
        .with_static_method("classMethodWithParameters", |_, arguments| pair(arguments))
        .with_static_method("classMethodWithoutParameters", |_, _| Ok(Object::Nil))
        .with_call_hook(|_, name, _| Ok(name.into()))
        .with_method("instanceMethodWithParameters", |_, arguments| pair(arguments))
        .with_method("instanceMethodWithoutParameters", |_, _| Ok(Object::Nil))
}

struct Fixture {
    runtime: RuntimeRef,
    class: ClassHandle,
}

impl Fixture {
    fn new() -> Self {
        let mut runtime = Runtime::new();
        runtime.define_function(FUNCTION_WITH_PARAMETERS, pair);
        runtime.define_function(FUNCTION_WITHOUT_PARAMETERS, |_| Ok(Object::Nil));
        let class = runtime.define_class(test_class());

        Self {
            runtime: runtime.into_ref(),
            class,
        }
    }

    fn instance(&self) -> InstanceHandle {
        Instance::new(self.class.clone()).into()
    }

    fn handle(&self, descriptor: impl Into<Object>) -> CallableHandle {
        CallableHandle::new(&self.runtime, descriptor).unwrap()
    }

    fn method(&self, receiver: Object, method: &str) -> CallableHandle {
        self.handle(Object::Array(vec![receiver, method.into()]))
    }

    /// Handles with and without parameters for every descriptor shape
    fn all_shapes(&self) -> Vec<(Kind, CallableHandle, CallableHandle)> {
        let instance: Object = self.instance().into();

        vec![
            (
                Kind::Function,
                self.handle(FUNCTION_WITH_PARAMETERS),
                self.handle(FUNCTION_WITHOUT_PARAMETERS),
            ),
            (
                Kind::Closure,
                self.handle(Closure::new(pair)),
                self.handle(Closure::new(|_| Ok(Object::Nil))),
            ),
            (
                Kind::InstanceMethod,
                self.method(instance.clone(), "instanceMethodWithParameters"),
                self.method(instance, "instanceMethodWithoutParameters"),
            ),
            (
                Kind::ClassMethod,
                self.method(TEST_CLASS.into(), "classMethodWithParameters"),
                self.method(TEST_CLASS.into(), "classMethodWithoutParameters"),
            ),
            (
                Kind::ClassMethod,
                self.handle(format!("{TEST_CLASS}::classMethodWithParameters")),
                self.handle(format!("{TEST_CLASS}::classMethodWithoutParameters")),
            ),
        ]
    }
}

fn one_two() -> Object {
    Object::Array(vec![1.into(), 2.into()])
}

#[test]
fn get_returns_the_function_name() {
    let fixture = Fixture::new();

    let handle = fixture.handle(FUNCTION_WITH_PARAMETERS);

    assert_eq!(handle.get(), Object::from(FUNCTION_WITH_PARAMETERS));
}

#[test]
fn get_returns_the_same_closure() {
    let fixture = Fixture::new();
    let closure = Closure::new(|_| Ok(Object::Nil));

    let handle = fixture.handle(closure.clone());

    assert_eq!(handle.get(), Object::Closure(closure));
}

#[test]
fn get_returns_the_instance_method_pair() {
    let fixture = Fixture::new();
    let instance = fixture.instance();

    let handle = fixture.method(instance.clone().into(), "instanceMethodWithParameters");

    assert_eq!(
        handle.get(),
        Object::Array(vec![instance.into(), "instanceMethodWithParameters".into()])
    );
}

#[test]
fn get_returns_the_class_method_pair() {
    let fixture = Fixture::new();
    let expected = Object::Array(vec![TEST_CLASS.into(), "classMethodWithParameters".into()]);

    let from_pair = fixture.method(TEST_CLASS.into(), "classMethodWithParameters");
    let from_string = fixture.handle(format!("{TEST_CLASS}::classMethodWithParameters"));

    assert_eq!(from_pair.get(), expected);
    assert_eq!(from_string.get(), expected);
}

#[test]
fn exactly_one_kind_predicate_holds() {
    let fixture = Fixture::new();

    for (kind, with_parameters, without_parameters) in fixture.all_shapes() {
        for handle in [with_parameters, without_parameters] {
            let predicates = [
                (Kind::Function, handle.is_function()),
                (Kind::Closure, handle.is_closure()),
                (Kind::InstanceMethod, handle.is_instance_method()),
                (Kind::ClassMethod, handle.is_class_method()),
            ];

            let held = predicates
                .iter()
                .filter(|(_, held)| *held)
                .map(|(kind, _)| *kind)
                .collect::<Vec<_>>();
            assert_eq!(held, vec![kind], "{handle}");
            assert_eq!(handle.kind(), kind);
        }
    }
}

#[test]
fn every_shape_is_callable_directly() {
    let fixture = Fixture::new();

    for (_, with_parameters, without_parameters) in fixture.all_shapes() {
        assert_eq!(call!(with_parameters, 1, 2).unwrap(), one_two(), "{with_parameters}");
        assert_eq!(call!(without_parameters).unwrap(), Object::Nil, "{without_parameters}");
    }
}

#[test]
fn every_shape_is_callable_with_invoke() {
    let fixture = Fixture::new();

    for (_, with_parameters, without_parameters) in fixture.all_shapes() {
        assert_eq!(with_parameters.invoke((1, 2)).unwrap(), one_two(), "{with_parameters}");
        assert_eq!(without_parameters.invoke(()).unwrap(), Object::Nil, "{without_parameters}");
    }
}

#[test]
fn every_shape_is_callable_with_invoke_args() {
    let fixture = Fixture::new();

    for (_, with_parameters, without_parameters) in fixture.all_shapes() {
        assert_eq!(
            with_parameters
                .invoke_args(vec![Object::from(1), Object::from(2)])
                .unwrap(),
            one_two(),
            "{with_parameters}"
        );
        assert_eq!(
            without_parameters.invoke_args(Vec::new()).unwrap(),
            Object::Nil,
            "{without_parameters}"
        );
    }
}

#[test]
fn repeated_invocation_is_stable() {
    let fixture = Fixture::new();

    for (kind, handle, _) in fixture.all_shapes() {
        for _ in 0..3 {
            assert_eq!(handle.invoke((1, 2)).unwrap(), one_two());
            assert_eq!(handle.kind(), kind);
        }
    }
}

#[test]
fn unknown_instance_method_routes_through_call_hook() {
    let fixture = Fixture::new();
    let instance: Object = fixture.instance().into();

    let unknown = fixture.method(instance.clone(), "unknownMethod");
    let hook = fixture.method(instance, "__call");

    assert!(unknown.is_instance_method());
    assert_eq!(unknown.invoke((1, 2)).unwrap(), Object::from("unknownMethod"));
    assert_eq!(
        hook.invoke(("name", Object::Array(vec![]))).unwrap(),
        Object::from("name")
    );
}

#[test]
fn call_static_hook_is_callable_through_an_instance() {
    let fixture = Fixture::new();
    let instance: Object = fixture.instance().into();

    let hook = fixture.method(instance, "__callStatic");

    assert!(hook.is_instance_method());
    assert_eq!(
        hook.invoke(("name", Object::Array(vec![]))).unwrap(),
        Object::from("name")
    );
}

#[test]
fn unknown_class_method_routes_through_call_static_hook() {
    let fixture = Fixture::new();

    let unknown = fixture.handle(format!("{TEST_CLASS}::unknownMethod"));
    let hook = fixture.method(TEST_CLASS.into(), "__callStatic");

    assert!(unknown.is_class_method());
    assert_eq!(unknown.invoke((1, 2)).unwrap(), Object::from("unknownMethod"));
    assert_eq!(
        hook.invoke_args(vec![Object::from("name"), Object::Array(vec![])])
            .unwrap(),
        Object::from("name")
    );
}

#[test]
fn missing_targets_are_unresolved() {
    let fixture = Fixture::new();
    let plain = fixture
        .runtime
        .borrow_mut()
        .define_class(Class::new("Plain"));
    let instance: Object = Instance::new(plain).into();

    for handle in [
        fixture.handle(r"Tests\Callable\noSuchFunction"),
        fixture.handle("NoSuchClass::method"),
        fixture.handle("Plain::method"),
        fixture.method(instance, "method"),
    ] {
        let report = handle.invoke(()).unwrap_err();
        assert!(report.contains::<UnresolvedCallableError>(), "{handle}");
    }
}

#[test]
fn malformed_descriptor_fails_construction() {
    let fixture = Fixture::new();

    let report = CallableHandle::new(&fixture.runtime, Object::from(true)).unwrap_err();

    assert!(report.contains::<InvalidDescriptorError>());
}

#[test]
fn callable_trait_matches_invoke() {
    let fixture = Fixture::new();

    for (_, handle, _) in fixture.all_shapes() {
        assert_eq!(
            Callable::call(&handle, vec![1.into(), 2.into()]).unwrap(),
            handle.invoke((1, 2)).unwrap()
        );
    }
}

struct Echo;

impl DynamicDispatch for Echo {
    fn invoke_missing(
        &self,
        receiver: Option<&InstanceHandle>,
        name: &str,
        arguments: Vec<Object>,
    ) -> NativeResult {
        let scope = if receiver.is_some() { "instance" } else { "static" };
        Ok(format!("{scope}:{name}:{}", arguments.len()).into())
    }
}

#[test]
fn dispatcher_serves_both_hooks() {
    let fixture = Fixture::new();
    let class = fixture
        .runtime
        .borrow_mut()
        .define_class(Class::new("Proxy").with_dispatcher(Rc::new(Echo)));
    let instance: Object = Instance::new(class).into();

    let on_instance = fixture.method(instance, "fetch");
    let on_class = fixture.handle("proxy::fetch");

    assert_eq!(on_instance.invoke((1,)).unwrap(), Object::from("instance:fetch:1"));
    assert_eq!(on_class.invoke((1, 2)).unwrap(), Object::from("static:fetch:2"));
}
