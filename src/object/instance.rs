use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::runtime::NativeResult;

#[derive(Debug, Clone)]
pub struct InstanceHandle(Rc<RefCell<Instance>>);

#[derive(Clone)]
pub struct Instance {
    class: super::ClassHandle,
    fields: HashMap<String, super::Object>,
}

impl Instance {
    pub fn new(class: super::ClassHandle) -> Self {
        Self {
            class,
            fields: HashMap::new(),
        }
    }
}

impl InstanceHandle {
    pub fn class(&self) -> super::ClassHandle {
        self.0.borrow().class.clone()
    }

    pub fn get(&self, name: &str) -> Option<super::Object> {
        self.0.borrow().fields.get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<super::Object>) {
        self.0.borrow_mut().fields.insert(name.into(), value.into());
    }

    /// Calls `name` on this instance.
    ///
    /// Resolution order: instance methods, then static methods of the class, then the
    /// class's `__call` hook. Both hooks can also be called by their own name, with
    /// `(name, [arguments])`.
    pub fn invoke_method(&self, name: &str, arguments: Vec<super::Object>) -> NativeResult {
        let class = self.class();

        if let Some(method) = class.find_method(name) {
            return method.call(self, arguments);
        }

        if let Some(method) = class.find_static_method(name) {
            return method.call(&class, arguments);
        }

        if super::class::is_hook_name(name, super::Class::CALL_STATIC_HOOK) {
            if let Some(hook) = class.call_static_hook() {
                let (missing, arguments) = super::class::unpack_hook_arguments(name, arguments)?;
                return hook.invoke_missing(None, &missing, arguments);
            }
        }

        if let Some(hook) = class.call_hook() {
            if super::class::is_hook_name(name, super::Class::CALL_HOOK) {
                let (missing, arguments) = super::class::unpack_hook_arguments(name, arguments)?;
                return hook.invoke_missing(Some(self), &missing, arguments);
            }

            tracing::debug!(class = class.name(), method = name, "routing through `__call`");
            return hook.invoke_missing(Some(self), name, arguments);
        }

        Err(crate::runtime::unresolved(format!("{}->{name}", class.name())))
    }
}

impl PartialEq for InstanceHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("fields", &self.fields.keys())
            .finish()
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {} instance>", self.class.name())
    }
}

impl From<Instance> for InstanceHandle {
    fn from(value: Instance) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
}

impl From<InstanceHandle> for super::Object {
    fn from(value: InstanceHandle) -> Self {
        Self::Instance(value)
    }
}

impl From<Instance> for super::Object {
    fn from(value: Instance) -> Self {
        Self::Instance(value.into())
    }
}
