use std::{fmt, ptr, rc::Rc};

use crate::{callable::Callable, runtime::NativeResult};

type ClosureFn = dyn Fn(Vec<super::Object>) -> NativeResult;

/// An anonymous in-memory function value.
///
/// Cloning a `Closure` shares the underlying function, and equality is identity: two closures
/// compare equal only when they are the same allocation.
#[derive(Clone)]
pub struct Closure(Rc<ClosureFn>);

impl Closure {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<super::Object>) -> NativeResult + 'static,
    {
        Self(Rc::new(f))
    }
}

impl Callable for Closure {
    fn call(&self, arguments: Vec<super::Object>) -> NativeResult {
        (self.0)(arguments)
    }
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Closure")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<closure>")
    }
}

impl From<Closure> for super::Object {
    fn from(value: Closure) -> Self {
        Self::Closure(value)
    }
}
