//! Leaf implementations for standard and ecosystem types
//!
//! Everything here is copied atomically: primitives, `String`, identifiers,
//! date/time values, free-form JSON and key/value maps.

use crate::descriptor::{cached, FieldShape, TypeDescriptor, TypeRef};
use crate::leaf_type;
use crate::reflect::{downcast, Field, FieldRef, Mappable, Mismatch};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;
use uuid::Uuid;

leaf_type!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String
);

leaf_type!(
    Uuid,
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    DateTime<Utc>,
    Duration,
    serde_json::Value
);

// Maps are attribute bags, not structured types with named fields.
macro_rules! map_leaf {
    ($map:ident $(, $bound:path)*) => {
        impl<K, V> Mappable for $map<K, V>
        where
            K: Clone + Debug + Send + Sync + 'static $(+ $bound)*,
            V: Clone + Debug + Send + Sync + 'static,
        {
            fn type_descriptor() -> &'static TypeDescriptor {
                cached::<Self>(TypeDescriptor::leaf::<Self>)
            }

            fn descriptor(&self) -> &'static TypeDescriptor {
                Self::type_descriptor()
            }

            fn clone_boxed(&self) -> Box<dyn Mappable> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }
        }

        impl<K, V> Field for $map<K, V>
        where
            K: Clone + Debug + Send + Sync + 'static $(+ $bound)*,
            V: Clone + Debug + Send + Sync + 'static,
        {
            fn shape() -> FieldShape {
                FieldShape::Single(TypeRef::of::<Self>())
            }

            fn read(&self) -> FieldRef<'_> {
                FieldRef::Value(self)
            }

            fn assign(&mut self, value: Box<dyn Mappable>) -> Result<(), Mismatch> {
                *self = downcast::<Self>(value)?;
                Ok(())
            }
        }
    };
}

map_leaf!(HashMap, Eq, Hash);
map_leaf!(BTreeMap, Ord);
