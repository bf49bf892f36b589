use std::fmt;

use crate::{
    object::{self, Object},
    runtime::{self, NativeResult, RuntimeRef},
};

mod arguments;

pub use arguments::Arguments;

pub trait Callable {
    fn call(&self, arguments: Vec<Object>) -> NativeResult;
}

#[derive(Debug)]
pub struct InvalidDescriptorError;

impl fmt::Display for InvalidDescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid callable descriptor")
    }
}

impl error_stack::Context for InvalidDescriptorError {}

/// Shape of the target a [`CallableHandle`] wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Function,
    Closure,
    InstanceMethod,
    ClassMethod,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Closure => write!(f, "closure"),
            Self::InstanceMethod => write!(f, "instance method"),
            Self::ClassMethod => write!(f, "class method"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum ClassRef {
    Name(String),
    Handle(object::ClassHandle),
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Function(String),
    Closure(object::Closure),
    InstanceMethod {
        receiver: object::InstanceHandle,
        method: String,
    },
    ClassMethod {
        class: ClassRef,
        method: String,
    },
}

impl Target {
    fn classify(descriptor: Object) -> error_stack::Result<Self, InvalidDescriptorError> {
        match descriptor {
            Object::Closure(closure) => Ok(Self::Closure(closure)),

            Object::String(name) => match name.split_once(runtime::STATIC_SEPARATOR) {
                None if !name.is_empty() => Ok(Self::Function(name)),
                Some((class, method)) if !class.is_empty() && !method.is_empty() => {
                    Ok(Self::ClassMethod {
                        class: ClassRef::Name(class.to_string()),
                        method: method.to_string(),
                    })
                }
                _ => Err(error_stack::report!(InvalidDescriptorError)
                    .attach_printable(format!("malformed callable name {name:?}"))),
            },

            Object::Array(pair) => {
                let [left, method] = <[Object; 2]>::try_from(pair).map_err(|pair| {
                    error_stack::report!(InvalidDescriptorError).attach_printable(format!(
                        "expected a (target, method) pair, got {} elements",
                        pair.len()
                    ))
                })?;

                let method = match method {
                    Object::String(method) if !method.is_empty() => method,
                    other => {
                        return Err(error_stack::report!(InvalidDescriptorError)
                            .attach_printable(format!(
                                "method name must be a non-empty string, got {}",
                                other.type_name()
                            )))
                    }
                };

                match left {
                    Object::Instance(receiver) => Ok(Self::InstanceMethod { receiver, method }),
                    Object::Class(class) => Ok(Self::ClassMethod {
                        class: ClassRef::Handle(class),
                        method,
                    }),
                    Object::String(class) if !class.is_empty() => Ok(Self::ClassMethod {
                        class: ClassRef::Name(class),
                        method,
                    }),
                    other => Err(error_stack::report!(InvalidDescriptorError).attach_printable(
                        format!("cannot call a method on {}", other.type_name()),
                    )),
                }
            }

            other => Err(error_stack::report!(InvalidDescriptorError)
                .attach_printable(format!("{} is not callable", other.type_name()))),
        }
    }

    fn kind(&self) -> Kind {
        match self {
            Self::Function(_) => Kind::Function,
            Self::Closure(_) => Kind::Closure,
            Self::InstanceMethod { .. } => Kind::InstanceMethod,
            Self::ClassMethod { .. } => Kind::ClassMethod,
        }
    }
}

/// Uniform handle over every way of naming something invocable.
///
/// A handle is built from a descriptor [`Object`]:
///
/// - a function name such as `"App\\helper"`,
/// - a `"Class::method"` string,
/// - a [`object::Closure`],
/// - an `[instance, "method"]` pair,
/// - a `["Class", "method"]` or `[class, "method"]` pair.
///
/// The descriptor is classified once. Names are resolved against the [`runtime::Runtime`] only
/// when the handle is invoked, so building a handle never fails for a well-formed descriptor even
/// if nothing by that name exists yet.
#[derive(Debug, Clone)]
pub struct CallableHandle {
    runtime: RuntimeRef,
    target: Target,
}

impl CallableHandle {
    pub fn new(
        runtime: &RuntimeRef,
        descriptor: impl Into<Object>,
    ) -> error_stack::Result<Self, InvalidDescriptorError> {
        let target = Target::classify(descriptor.into())?;
        tracing::trace!(kind = %target.kind(), "classified callable");

        Ok(Self {
            runtime: runtime.clone(),
            target,
        })
    }

    /// The descriptor this handle was built from.
    ///
    /// Function names and closures come back as given. Method references, including
    /// `"Class::method"` strings, come back as a two-element `[target, method]` array.
    pub fn get(&self) -> Object {
        match &self.target {
            Target::Function(name) => name.clone().into(),
            Target::Closure(closure) => closure.clone().into(),
            Target::InstanceMethod { receiver, method } => {
                Object::Array(vec![receiver.clone().into(), method.clone().into()])
            }
            Target::ClassMethod { class, method } => {
                let class: Object = match class {
                    ClassRef::Name(name) => name.clone().into(),
                    ClassRef::Handle(class) => class.clone().into(),
                };
                Object::Array(vec![class, method.clone().into()])
            }
        }
    }

    pub fn kind(&self) -> Kind {
        self.target.kind()
    }

    pub fn is_function(&self) -> bool {
        self.kind() == Kind::Function
    }

    pub fn is_closure(&self) -> bool {
        self.kind() == Kind::Closure
    }

    pub fn is_instance_method(&self) -> bool {
        self.kind() == Kind::InstanceMethod
    }

    pub fn is_class_method(&self) -> bool {
        self.kind() == Kind::ClassMethod
    }

    /// Invokes the target with spread arguments, e.g. `handle.invoke((1, 2))`
    pub fn invoke(&self, arguments: impl Arguments) -> NativeResult {
        self.dispatch(arguments.into_arguments())
    }

    /// Invokes the target with an ordered collection of arguments
    pub fn invoke_args(&self, arguments: impl IntoIterator<Item = Object>) -> NativeResult {
        self.dispatch(arguments.into_iter().collect())
    }

    /// Turns the handle into a first-class closure value
    pub fn into_closure(self) -> object::Closure {
        object::Closure::new(move |arguments| self.dispatch(arguments))
    }

    fn dispatch(&self, arguments: Vec<Object>) -> NativeResult {
        tracing::trace!(callable = %self, arguments = arguments.len(), "invoking callable");

        match &self.target {
            Target::Function(name) => {
                let function = self.runtime.borrow().function(name);
                function
                    .ok_or_else(|| runtime::unresolved(name.as_str()))?
                    .call(arguments)
            }

            Target::Closure(closure) => closure.call(arguments),

            Target::InstanceMethod { receiver, method } => {
                receiver.invoke_method(method, arguments)
            }

            Target::ClassMethod { class, method } => {
                let class = match class {
                    ClassRef::Handle(class) => class.clone(),
                    ClassRef::Name(name) => {
                        let class = self.runtime.borrow().class(name);
                        class.ok_or_else(|| {
                            runtime::unresolved(format!(
                                "{name}{}{method}",
                                runtime::STATIC_SEPARATOR
                            ))
                        })?
                    }
                };
                class.invoke_static(method, arguments)
            }
        }
    }
}

impl Callable for CallableHandle {
    fn call(&self, arguments: Vec<Object>) -> NativeResult {
        self.dispatch(arguments)
    }
}

impl From<CallableHandle> for object::Closure {
    fn from(value: CallableHandle) -> Self {
        value.into_closure()
    }
}

impl fmt::Display for CallableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Function(name) => write!(f, "<fn {name}>"),
            Target::Closure(closure) => closure.fmt(f),
            Target::InstanceMethod { receiver, method } => {
                write!(f, "<method {}->{method}>", receiver.class().name())
            }
            Target::ClassMethod { class, method } => match class {
                ClassRef::Name(name) => write!(f, "<method {name}::{method}>"),
                ClassRef::Handle(class) => write!(f, "<method {}::{method}>", class.name()),
            },
        }
    }
}
