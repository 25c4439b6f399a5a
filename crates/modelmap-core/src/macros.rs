//! Declarative macros generating reflection impls
//!
//! - [`mappable!`](crate::mappable) declares a struct together with its
//!   [`Mappable`](crate::Mappable) and [`Field`](crate::Field) impls and its
//!   field descriptor table, including per-field directives.
//! - [`leaf_type!`](crate::leaf_type) registers existing types as leaf values
//!   that are copied atomically.

/// Declare a mappable struct.
///
/// The struct must derive (or implement) `Debug`, `Clone` and `Default`;
/// `Default` is its zero-argument constructor. Directives follow a field's
/// type after `=>`:
///
/// ```
/// use modelmap_core::{mappable, Directive, IntegerToStringAdapter};
///
/// mappable! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct AccountDto {
///         pub owner: String,
///         pub number: String => [Directive::transform::<IntegerToStringAdapter>()],
///         pub nickname: String => [Directive::redirect(&["alias"])],
///     }
/// }
///
/// let descriptor = <AccountDto as modelmap_core::Mappable>::type_descriptor();
/// assert_eq!(descriptor.fields().len(), 3);
/// ```
#[macro_export]
macro_rules! mappable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty $(=> [$($directive:expr),* $(,)?])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::Mappable for $name {
            fn type_descriptor() -> &'static $crate::TypeDescriptor {
                $crate::descriptor::cached::<$name>(|| {
                    $crate::TypeDescriptor::structured::<$name>(::std::vec![
                        $(
                            $crate::FieldDescriptor::of::<$field_ty>(::std::stringify!($field))
                                $($(.with_directive($directive))*)?
                        ),*
                    ])
                })
            }

            fn descriptor(&self) -> &'static $crate::TypeDescriptor {
                <$name as $crate::Mappable>::type_descriptor()
            }

            fn field(&self, name: &str) -> ::std::option::Option<&dyn $crate::Field> {
                $(
                    if name == ::std::stringify!($field) {
                        return ::std::option::Option::Some(&self.$field as &dyn $crate::Field);
                    }
                )*
                let _ = name;
                ::std::option::Option::None
            }

            fn field_mut(&mut self, name: &str) -> ::std::option::Option<&mut dyn $crate::Field> {
                $(
                    if name == ::std::stringify!($field) {
                        return ::std::option::Option::Some(&mut self.$field as &mut dyn $crate::Field);
                    }
                )*
                let _ = name;
                ::std::option::Option::None
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn $crate::Mappable> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        $crate::__single_field!($name);
    };
}

/// Register types as leaf values.
///
/// Each type must implement `Debug`, `Clone`, `Default`, `Send` and `Sync`.
///
/// ```
/// use modelmap_core::{leaf_type, Mappable, TypeKind};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// pub enum Status {
///     #[default]
///     Active,
///     Suspended,
/// }
///
/// leaf_type!(Status);
///
/// assert_eq!(<Status as Mappable>::type_descriptor().kind(), TypeKind::Leaf);
/// ```
#[macro_export]
macro_rules! leaf_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Mappable for $ty {
                fn type_descriptor() -> &'static $crate::TypeDescriptor {
                    $crate::descriptor::cached::<$ty>($crate::TypeDescriptor::leaf::<$ty>)
                }

                fn descriptor(&self) -> &'static $crate::TypeDescriptor {
                    <$ty as $crate::Mappable>::type_descriptor()
                }

                fn clone_boxed(&self) -> ::std::boxed::Box<dyn $crate::Mappable> {
                    ::std::boxed::Box::new(::std::clone::Clone::clone(self))
                }

                fn as_any(&self) -> &dyn ::std::any::Any {
                    self
                }

                fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                    self
                }
            }

            $crate::__single_field!($ty);
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __single_field {
    ($ty:ty) => {
        impl $crate::Field for $ty {
            fn shape() -> $crate::FieldShape {
                $crate::FieldShape::Single($crate::TypeRef::of::<$ty>())
            }

            fn read(&self) -> $crate::FieldRef<'_> {
                $crate::FieldRef::Value(self)
            }

            fn assign(
                &mut self,
                value: ::std::boxed::Box<dyn $crate::Mappable>,
            ) -> ::std::result::Result<(), $crate::Mismatch> {
                *self = $crate::reflect::downcast::<$ty>(value)?;
                ::std::result::Result::Ok(())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Directive, FieldShape, Mappable, StringToUuidAdapter, TypeKind, TypeRef};
    use uuid::Uuid;

    crate::mappable! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Sample {
            /// Documented field
            pub label: String,
            count: Option<u32>,
            tags: Vec<String>,
            id: Uuid => [Directive::transform::<StringToUuidAdapter>(), Directive::redirect(&["key"])],
        }
    }

    crate::mappable! {
        #[derive(Debug, Clone, Default)]
        struct Empty {}
    }

    #[test]
    fn test_descriptor_lists_fields_in_declaration_order() {
        let descriptor = <Sample as Mappable>::type_descriptor();
        let names: Vec<&str> = descriptor.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["label", "count", "tags", "id"]);
        assert_eq!(descriptor.kind(), TypeKind::Structured);
    }

    #[test]
    fn test_descriptor_shapes_and_directives() {
        let descriptor = <Sample as Mappable>::type_descriptor();
        assert_eq!(
            descriptor.field("count").map(|f| f.shape().clone()),
            Some(FieldShape::Optional(TypeRef::of::<u32>()))
        );
        let id = descriptor.field("id").unwrap();
        assert!(id.adapter().is_some());
        assert!(id.redirects_from("key"));
        assert_eq!(descriptor.redirect_targets("key").count(), 1);
    }

    #[test]
    fn test_field_access_by_name() {
        let mut sample = Sample::default();
        sample
            .field_mut("label")
            .unwrap()
            .assign(Box::new("hello".to_string()))
            .unwrap();
        assert_eq!(sample.label, "hello");
        assert!(sample.field("missing").is_none());
    }

    #[test]
    fn test_empty_struct_has_no_fields() {
        let descriptor = <Empty as Mappable>::type_descriptor();
        assert!(descriptor.fields().is_empty());
        assert!(Empty::default().field("anything").is_none());
    }
}
