use std::{collections::HashMap, fmt, ops::Deref, rc::Rc};

use crate::{
    object::dispatch::DynamicDispatch,
    runtime::{self, InvocationError, NativeResult},
};

type MethodFn = dyn Fn(&super::InstanceHandle, Vec<super::Object>) -> NativeResult;
type StaticMethodFn = dyn Fn(&ClassHandle, Vec<super::Object>) -> NativeResult;

#[derive(Clone)]
pub struct Method(Rc<MethodFn>);

#[derive(Clone)]
pub struct StaticMethod(Rc<StaticMethodFn>);

impl Method {
    pub fn call(
        &self,
        receiver: &super::InstanceHandle,
        arguments: Vec<super::Object>,
    ) -> NativeResult {
        (self.0)(receiver, arguments)
    }
}

impl StaticMethod {
    pub fn call(&self, class: &ClassHandle, arguments: Vec<super::Object>) -> NativeResult {
        (self.0)(class, arguments)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<method>")
    }
}

impl fmt::Debug for StaticMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<static method>")
    }
}

#[derive(Debug, Clone)]
pub struct ClassHandle(Rc<Class>);

pub struct Class {
    name: String,

    superclass: Option<ClassHandle>,

    /// Keyed by [`runtime::name_key`]
    methods: HashMap<String, Method>,
    static_methods: HashMap<String, StaticMethod>,

    call_hook: Option<Rc<dyn DynamicDispatch>>,
    call_static_hook: Option<Rc<dyn DynamicDispatch>>,
}

impl Class {
    /// Hook consulted when an instance method does not resolve
    pub const CALL_HOOK: &'static str = "__call";

    /// Hook consulted when a static method does not resolve
    pub const CALL_STATIC_HOOK: &'static str = "__callStatic";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            methods: HashMap::new(),
            static_methods: HashMap::new(),
            call_hook: None,
            call_static_hook: None,
        }
    }

    pub fn with_superclass(self, superclass: ClassHandle) -> Self {
        Self {
            superclass: Some(superclass),
            ..self
        }
    }

    pub fn with_method<F>(mut self, name: &str, method: F) -> Self
    where
        F: Fn(&super::InstanceHandle, Vec<super::Object>) -> NativeResult + 'static,
    {
        self.methods
            .insert(runtime::name_key(name), Method(Rc::new(method)));
        self
    }

    pub fn with_static_method<F>(mut self, name: &str, method: F) -> Self
    where
        F: Fn(&ClassHandle, Vec<super::Object>) -> NativeResult + 'static,
    {
        self.static_methods
            .insert(runtime::name_key(name), StaticMethod(Rc::new(method)));
        self
    }

    /// Installs the `__call` hook
    pub fn with_call_hook<F>(self, hook: F) -> Self
    where
        F: Fn(Option<&super::InstanceHandle>, &str, Vec<super::Object>) -> NativeResult + 'static,
    {
        Self {
            call_hook: Some(Rc::new(hook)),
            ..self
        }
    }

    /// Installs the `__callStatic` hook
    pub fn with_call_static_hook<F>(self, hook: F) -> Self
    where
        F: Fn(Option<&super::InstanceHandle>, &str, Vec<super::Object>) -> NativeResult + 'static,
    {
        Self {
            call_static_hook: Some(Rc::new(hook)),
            ..self
        }
    }

    /// Installs one dispatcher as both hooks. It can tell them apart by whether a receiver is
    /// passed.
    pub fn with_dispatcher(self, dispatcher: Rc<dyn DynamicDispatch>) -> Self {
        Self {
            call_hook: Some(dispatcher.clone()),
            call_static_hook: Some(dispatcher),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&ClassHandle> {
        self.superclass.as_ref()
    }

    pub fn find_method(&self, name: &str) -> Option<Method> {
        self.methods
            .get(&runtime::name_key(name))
            .cloned()
            .or_else(|| {
                self.superclass
                    .as_ref()
                    .and_then(|superclass| superclass.find_method(name))
            })
    }

    pub fn find_static_method(&self, name: &str) -> Option<StaticMethod> {
        self.static_methods
            .get(&runtime::name_key(name))
            .cloned()
            .or_else(|| {
                self.superclass
                    .as_ref()
                    .and_then(|superclass| superclass.find_static_method(name))
            })
    }

    pub fn call_hook(&self) -> Option<Rc<dyn DynamicDispatch>> {
        self.call_hook.clone().or_else(|| {
            self.superclass
                .as_ref()
                .and_then(|superclass| superclass.call_hook())
        })
    }

    pub fn call_static_hook(&self) -> Option<Rc<dyn DynamicDispatch>> {
        self.call_static_hook.clone().or_else(|| {
            self.superclass
                .as_ref()
                .and_then(|superclass| superclass.call_static_hook())
        })
    }
}

impl ClassHandle {
    /// Calls the static method `name`, falling back to the `__callStatic` hook
    pub fn invoke_static(&self, name: &str, arguments: Vec<super::Object>) -> NativeResult {
        if let Some(method) = self.find_static_method(name) {
            return method.call(self, arguments);
        }

        if let Some(hook) = self.call_static_hook() {
            if is_hook_name(name, Class::CALL_STATIC_HOOK) {
                let (missing, arguments) = unpack_hook_arguments(name, arguments)?;
                return hook.invoke_missing(None, &missing, arguments);
            }

            tracing::debug!(
                class = self.name(),
                method = name,
                "routing through `__callStatic`"
            );
            return hook.invoke_missing(None, name, arguments);
        }

        Err(runtime::unresolved(format!("{}::{name}", self.name())))
    }
}

pub(super) fn is_hook_name(name: &str, hook: &str) -> bool {
    runtime::name_key(name) == runtime::name_key(hook)
}

/// Splits the `(name, arguments)` pair a hook receives when it is called by its own name.
///
/// A non-string name is taken by its `Display` form and a non-array argument list becomes a
/// single argument.
pub(super) fn unpack_hook_arguments(
    hook: &str,
    arguments: Vec<super::Object>,
) -> error_stack::Result<(String, Vec<super::Object>), InvocationError> {
    let [name, arguments] = <[super::Object; 2]>::try_from(arguments).map_err(|arguments| {
        error_stack::report!(InvocationError).attach_printable(format!(
            "`{hook}` expects 2 arguments, got {}",
            arguments.len()
        ))
    })?;

    let name = match name {
        super::Object::String(name) => name,
        other => other.to_string(),
    };
    let arguments = match arguments {
        super::Object::Array(arguments) => arguments,
        other => vec![other],
    };

    Ok((name, arguments))
}

impl PartialEq for ClassHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for ClassHandle {
    type Target = Class;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name()))
            .field("methods", &self.methods.keys())
            .field("static_methods", &self.static_methods.keys())
            .field("call_hook", &self.call_hook.is_some())
            .field("call_static_hook", &self.call_static_hook.is_some())
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

impl fmt::Display for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Class> for ClassHandle {
    fn from(value: Class) -> Self {
        Self(Rc::new(value))
    }
}

impl From<ClassHandle> for super::Object {
    fn from(value: ClassHandle) -> Self {
        Self::Class(value)
    }
}

impl From<Class> for super::Object {
    fn from(value: Class) -> Self {
        Self::Class(value.into())
    }
}
