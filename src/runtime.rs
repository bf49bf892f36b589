use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::object;

/// Separator between namespace segments in a qualified name, e.g. `Tests\helper`
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separator between a class name and a method name, e.g. `TestClass::create`
pub const STATIC_SEPARATOR: &str = "::";

/// Result of invoking any target: free function, closure, method or hook
pub type NativeResult = error_stack::Result<object::Object, InvocationError>;

pub type RuntimeRef = Rc<RefCell<Runtime>>;

#[derive(Debug)]
pub struct InvocationError;

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invocation error")
    }
}

impl error_stack::Context for InvocationError {}

#[derive(Debug)]
pub struct UnresolvedCallableError {
    name: String,
}

impl UnresolvedCallableError {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnresolvedCallableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call to undefined `{}`", self.name)
    }
}

impl error_stack::Context for UnresolvedCallableError {}

pub(crate) fn unresolved(name: impl Into<String>) -> error_stack::Report<InvocationError> {
    let name = name.into();
    tracing::debug!(name = %name, "unresolved callable");

    error_stack::report!(UnresolvedCallableError { name }).change_context(InvocationError)
}

/// Lookup key for functions, classes and methods: case-insensitive, with any leading namespace
/// separator dropped
pub(crate) fn name_key(name: &str) -> String {
    name.trim_start_matches(NAMESPACE_SEPARATOR).to_lowercase()
}

/// Registry that resolves function and class names at invocation time
#[derive(Debug, Default)]
pub struct Runtime {
    functions: HashMap<String, object::Closure>,
    classes: HashMap<String, object::ClassHandle>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_ref(self) -> RuntimeRef {
        Rc::new(RefCell::new(self))
    }

    pub fn define_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(Vec<object::Object>) -> NativeResult + 'static,
    {
        tracing::trace!(name, "defining function");
        self.functions
            .insert(name_key(name), object::Closure::new(function));
    }

    pub fn define_class(&mut self, class: impl Into<object::ClassHandle>) -> object::ClassHandle {
        let class = class.into();
        tracing::trace!(name = class.name(), "defining class");
        self.classes.insert(name_key(class.name()), class.clone());

        class
    }

    pub fn function(&self, name: &str) -> Option<object::Closure> {
        self.functions.get(&name_key(name)).cloned()
    }

    pub fn class(&self, name: &str) -> Option<object::ClassHandle> {
        self.classes.get(&name_key(name)).cloned()
    }
}
