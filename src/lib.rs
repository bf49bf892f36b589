//! One handle for every way of naming something invocable.
//!
//! A [`CallableHandle`] wraps a free function name, a closure, an `[instance, "method"]` pair or a
//! class-level method (`["Class", "method"]` or `"Class::method"`). It reports which of the four
//! it is and invokes it through one contract:
//!
//! ```
//! use callable_object::{call, object::Object, runtime::Runtime, CallableHandle};
//!
//! let runtime = Runtime::new().into_ref();
//! runtime
//!     .borrow_mut()
//!     .define_function("pair", |arguments| Ok(arguments.into()));
//!
//! let handle = CallableHandle::new(&runtime, "pair").unwrap();
//! let expected = Object::Array(vec![1.into(), 2.into()]);
//!
//! assert!(handle.is_function());
//! assert_eq!(handle.invoke((1, 2)).unwrap(), expected);
//! assert_eq!(handle.invoke_args(vec![Object::from(1), Object::from(2)]).unwrap(), expected);
//! assert_eq!(call!(handle, 1, 2).unwrap(), expected);
//! ```

pub mod callable;
pub mod object;
pub mod runtime;

pub use callable::{Arguments, Callable, CallableHandle, InvalidDescriptorError, Kind};
pub use runtime::{InvocationError, NativeResult, Runtime, RuntimeRef, UnresolvedCallableError};

/// Calls anything [`Callable`] with spread arguments: `call!(handle, 1, "two")`
#[macro_export]
macro_rules! call {
    ($callable:expr $(, $arg:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::Callable as _;
        ($callable).call(::std::vec![$($crate::object::Object::from($arg)),*])
    }};
}
