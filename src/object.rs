use std::fmt;

use itertools::Itertools as _;

pub mod class;
pub mod closure;
pub mod dispatch;
pub mod instance;

pub use class::{Class, ClassHandle};
pub use closure::Closure;
pub use dispatch::DynamicDispatch;
pub use instance::{Instance, InstanceHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Number(f64),
    String(String),
    Bool(bool),
    Array(Vec<Object>),
    Closure(Closure),
    Instance(InstanceHandle),
    Class(ClassHandle),
    Nil,
}

impl Object {
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Short name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Array(_) => "array",
            Self::Closure(_) => "closure",
            Self::Instance(_) => "instance",
            Self::Class(_) => "class",
            Self::Nil => "nil",
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Number(n) => write!(f, "{n}"),
            Object::String(s) => write!(f, "{s}"),
            Object::Bool(b) => write!(f, "{b}"),
            Object::Array(items) => write!(f, "[{}]", items.iter().join(", ")),
            Object::Closure(closure) => closure.fmt(f),
            Object::Instance(instance) => instance.fmt(f),
            Object::Class(class) => class.fmt(f),
            Object::Nil => write!(f, "nil"),
        }
    }
}

impl From<f64> for Object {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Object {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Object>> for Object {
    fn from(value: Vec<Object>) -> Self {
        Self::Array(value)
    }
}

impl From<()> for Object {
    fn from(_: ()) -> Self {
        Self::Nil
    }
}
