use crate::runtime::NativeResult;

/// Fallback invoked when a method name does not resolve on a receiver or a class.
///
/// `receiver` is `Some` when the lookup was made against an instance (the `__call` hook) and
/// `None` for class-level lookups (the `__callStatic` hook). `name` is the method name exactly as
/// the caller spelled it, and `arguments` holds the packaged positional arguments.
pub trait DynamicDispatch {
    fn invoke_missing(
        &self,
        receiver: Option<&super::InstanceHandle>,
        name: &str,
        arguments: Vec<super::Object>,
    ) -> NativeResult;
}

impl<F> DynamicDispatch for F
where
    F: Fn(Option<&super::InstanceHandle>, &str, Vec<super::Object>) -> NativeResult,
{
    fn invoke_missing(
        &self,
        receiver: Option<&super::InstanceHandle>,
        name: &str,
        arguments: Vec<super::Object>,
    ) -> NativeResult {
        self(receiver, name, arguments)
    }
}
