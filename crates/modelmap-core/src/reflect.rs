//! Runtime reflection over mappable types
//!
//! Rust has no field-level runtime reflection, so every type that takes part in
//! a mapping exposes itself through two object-safe traits:
//!
//! - [`Mappable`]: the value as a whole. Exposes its cached [`TypeDescriptor`], by-name
//!   field access, cloning and `Any` conversion.
//! - [`Field`]: one field slot of a struct. Read it as a [`FieldRef`], assign a
//!   boxed value into it, or append to it when it is a collection.
//!
//! Implementations are normally generated by [`mappable!`](crate::mappable)
//! for structs and [`leaf_type!`](crate::leaf_type) for atomic values.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::collection::DynCollection;
use crate::descriptor::{FieldShape, TypeDescriptor, TypeRef};
use std::any::{type_name, Any};
use std::fmt;

/// A value the mapping engine can read from and write into
pub trait Mappable: Any + Send + Sync + fmt::Debug {
    /// Descriptor of the implementing type, built once and cached
    fn type_descriptor() -> &'static TypeDescriptor
    where
        Self: Sized;

    /// Descriptor of this value's runtime type
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// Read access to a named field
    fn field(&self, name: &str) -> Option<&dyn Field> {
        let _ = name;
        None
    }

    /// Write access to a named field
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Field> {
        let _ = name;
        None
    }

    fn clone_boxed(&self) -> Box<dyn Mappable>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl Clone for Box<dyn Mappable> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

/// Read view of a single field value
#[derive(Clone, Copy)]
pub enum FieldRef<'a> {
    /// `None` in an optional field
    Absent,
    /// A single leaf or structured value
    Value(&'a dyn Mappable),
    /// A collection of values
    Collection(&'a dyn DynCollection),
}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Absent => write!(f, "Absent"),
            FieldRef::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldRef::Collection(collection) => f
                .debug_struct("Collection")
                .field("kind", &collection.kind())
                .field("len", &collection.len())
                .finish(),
        }
    }
}

/// A value was offered to a slot of a different type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// One field slot of a mappable struct
pub trait Field: Send + Sync {
    /// Declared shape of the implementing field type
    fn shape() -> FieldShape
    where
        Self: Sized;

    fn read(&self) -> FieldRef<'_>;

    /// Replace the field's value. The value must be of the declared type.
    fn assign(&mut self, value: Box<dyn Mappable>) -> Result<(), Mismatch>;

    /// The field's collection, when the field is collection-shaped
    fn as_collection_mut(&mut self) -> Option<&mut dyn DynCollection> {
        None
    }
}

impl<T: Mappable> Field for Option<T> {
    fn shape() -> FieldShape {
        FieldShape::Optional(TypeRef::of::<T>())
    }

    fn read(&self) -> FieldRef<'_> {
        match self {
            Some(value) => FieldRef::Value(value),
            None => FieldRef::Absent,
        }
    }

    fn assign(&mut self, value: Box<dyn Mappable>) -> Result<(), Mismatch> {
        *self = Some(downcast::<T>(value)?);
        Ok(())
    }
}

/// Move a boxed value back into its concrete type
pub fn downcast<T: Mappable>(value: Box<dyn Mappable>) -> Result<T, Mismatch> {
    let found = value.descriptor().name();
    value
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Mismatch {
            expected: type_name::<T>(),
            found,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_matching_type() {
        let value: Box<dyn Mappable> = Box::new(String::from("abc"));
        assert_eq!(downcast::<String>(value).unwrap(), "abc");
    }

    #[test]
    fn test_downcast_reports_both_types() {
        let value: Box<dyn Mappable> = Box::new(7_i64);
        let mismatch = downcast::<String>(value).unwrap_err();
        assert_eq!(mismatch.found, "i64");
        assert_eq!(mismatch.expected, type_name::<String>());
    }

    #[test]
    fn test_boxed_clone_keeps_value() {
        let value: Box<dyn Mappable> = Box::new(42_u8);
        let copy = value.clone();
        assert_eq!(copy.as_any().downcast_ref::<u8>(), Some(&42));
    }

    #[test]
    fn test_optional_field_reads_absent() {
        let field: Option<String> = None;
        assert!(matches!(field.read(), FieldRef::Absent));
    }

    #[test]
    fn test_optional_field_assign_wraps_value() {
        let mut field: Option<String> = None;
        field.assign(Box::new(String::from("set"))).unwrap();
        assert_eq!(field.as_deref(), Some("set"));
        assert!(matches!(field.read(), FieldRef::Value(_)));
        assert!(field.assign(Box::new(3_i64)).is_err());
    }
}
