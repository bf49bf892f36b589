use crate::object::Object;

/// Positional arguments in spread form: `()`, `(a,)`, `(a, b)`, ... up to eight values
pub trait Arguments {
    fn into_arguments(self) -> Vec<Object>;
}

macro_rules! impl_arguments {
    ($($arg:ident),*) => {
        impl<$($arg: Into<Object>),*> Arguments for ($($arg,)*) {
            #[allow(non_snake_case)]
            fn into_arguments(self) -> Vec<Object> {
                let ($($arg,)*) = self;
                vec![$($arg.into()),*]
            }
        }
    };
}

impl_arguments!();
impl_arguments!(A);
impl_arguments!(A, B);
impl_arguments!(A, B, C);
impl_arguments!(A, B, C, D);
impl_arguments!(A, B, C, D, E);
impl_arguments!(A, B, C, D, E, F);
impl_arguments!(A, B, C, D, E, F, G);
impl_arguments!(A, B, C, D, E, F, G, H);
