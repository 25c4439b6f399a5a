//! Collection fields and the collection element factory
//!
//! Collections are reflected through [`DynCollection`]: iterate elements in
//! the collection's own order and append boxed elements. [`Field`] is
//! implemented for `Vec`, `VecDeque`, `LinkedList`, `HashSet` and `BTreeSet`
//! of any [`Mappable`] element type.
//!
//! A Rust collection field always holds a collection (there is no null
//! collection to replace), so the engine appends to the existing instance.
//! The [`CollectionFactory`] decides which collection kinds are recognized and
//! produces the fresh element instances that get appended.
//!
//! Elements are never absent: `Option<T>` is not [`Mappable`], so a
//! `Vec<Option<T>>` field cannot be declared.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::descriptor::{FieldShape, TypeRef};
use crate::error::MappingError;
use crate::reflect::{downcast, Field, FieldRef, Mappable, Mismatch};
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Concrete kind of a collection field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// `Vec<T>`
    List,
    /// `VecDeque<T>`
    Deque,
    /// `LinkedList<T>`
    LinkedList,
    /// `HashSet<T>`
    HashSet,
    /// `BTreeSet<T>`
    BTreeSet,
    /// Caller-defined collection reported by a hand-written [`DynCollection`]
    Custom(String),
}

impl CollectionKind {
    /// Kinds shipped with the crate
    pub fn standard() -> BTreeSet<CollectionKind> {
        [
            CollectionKind::List,
            CollectionKind::Deque,
            CollectionKind::LinkedList,
            CollectionKind::HashSet,
            CollectionKind::BTreeSet,
        ]
        .into_iter()
        .collect()
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::List => write!(f, "list"),
            CollectionKind::Deque => write!(f, "deque"),
            CollectionKind::LinkedList => write!(f, "linked_list"),
            CollectionKind::HashSet => write!(f, "hash_set"),
            CollectionKind::BTreeSet => write!(f, "btree_set"),
            CollectionKind::Custom(name) => write!(f, "custom({name})"),
        }
    }
}

/// Type-erased view of a collection field
pub trait DynCollection: Send + Sync {
    fn kind(&self) -> CollectionKind;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements in the collection's iteration order
    fn elements(&self) -> Box<dyn Iterator<Item = &dyn Mappable> + '_>;

    /// Append an element of the declared element type
    fn insert_element(&mut self, element: Box<dyn Mappable>) -> Result<(), Mismatch>;
}

fn not_assignable<C>(value: &dyn Mappable) -> Mismatch {
    Mismatch {
        expected: type_name::<C>(),
        found: value.descriptor().name(),
    }
}

macro_rules! collection_field {
    ($collection:ident, $kind:expr, $insert:ident $(, $bound:path)*) => {
        impl<T: Mappable $(+ $bound)*> DynCollection for $collection<T> {
            fn kind(&self) -> CollectionKind {
                $kind
            }

            fn len(&self) -> usize {
                $collection::len(self)
            }

            fn elements(&self) -> Box<dyn Iterator<Item = &dyn Mappable> + '_> {
                Box::new(self.iter().map(|element| element as &dyn Mappable))
            }

            fn insert_element(&mut self, element: Box<dyn Mappable>) -> Result<(), Mismatch> {
                let element = downcast::<T>(element)?;
                self.$insert(element);
                Ok(())
            }
        }

        impl<T: Mappable $(+ $bound)*> Field for $collection<T> {
            fn shape() -> FieldShape {
                FieldShape::Collection {
                    kind: $kind,
                    element: TypeRef::of::<T>(),
                }
            }

            fn read(&self) -> FieldRef<'_> {
                FieldRef::Collection(self)
            }

            fn assign(&mut self, value: Box<dyn Mappable>) -> Result<(), Mismatch> {
                Err(not_assignable::<Self>(&*value))
            }

            fn as_collection_mut(&mut self) -> Option<&mut dyn DynCollection> {
                Some(self)
            }
        }
    };
}

collection_field!(Vec, CollectionKind::List, push);
collection_field!(VecDeque, CollectionKind::Deque, push_back);
collection_field!(LinkedList, CollectionKind::LinkedList, push_back);
collection_field!(HashSet, CollectionKind::HashSet, insert, Eq, Hash);
collection_field!(BTreeSet, CollectionKind::BTreeSet, insert, Ord);

/// Registry of recognized collection kinds and source of fresh elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFactory {
    kinds: BTreeSet<CollectionKind>,
}

impl Default for CollectionFactory {
    fn default() -> Self {
        Self {
            kinds: CollectionKind::standard(),
        }
    }
}

impl CollectionFactory {
    pub fn new(kinds: impl IntoIterator<Item = CollectionKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn register(&mut self, kind: CollectionKind) {
        self.kinds.insert(kind);
    }

    pub fn recognizes(&self, kind: &CollectionKind) -> bool {
        self.kinds.contains(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &CollectionKind> {
        self.kinds.iter()
    }

    /// Fail unless `kind` is registered
    pub fn ensure_recognized(&self, kind: &CollectionKind, field: &str) -> Result<(), MappingError> {
        if self.recognizes(kind) {
            Ok(())
        } else {
            Err(MappingError::UnsupportedCollectionKind {
                field: field.to_string(),
                kind: kind.clone(),
            })
        }
    }

    /// Fresh element of the declared element type
    pub fn new_element(&self, element: &TypeRef) -> Result<Box<dyn Mappable>, MappingError> {
        element.descriptor().instantiate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_appends_in_order() {
        let mut list: Vec<String> = vec!["a".to_string()];
        let collection: &mut dyn DynCollection = &mut list;
        collection.insert_element(Box::new("b".to_string())).unwrap();
        collection.insert_element(Box::new("c".to_string())).unwrap();
        assert_eq!(list, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_rejects_wrong_element_type() {
        let mut list: VecDeque<i32> = VecDeque::new();
        let mismatch = DynCollection::insert_element(&mut list, Box::new(1_i64)).unwrap_err();
        assert_eq!(mismatch.found, "i64");
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_deduplicates() {
        let mut set: BTreeSet<u8> = BTreeSet::new();
        for value in [3_u8, 1, 3] {
            DynCollection::insert_element(&mut set, Box::new(value)).unwrap();
        }
        assert_eq!(DynCollection::len(&set), 2);
        let seen: Vec<u8> = set
            .elements()
            .filter_map(|element| element.as_any().downcast_ref::<u8>().copied())
            .collect();
        assert_eq!(seen, vec![1, 3]);
    }

    #[test]
    fn test_collection_shape() {
        assert_eq!(
            <HashSet<String> as Field>::shape(),
            FieldShape::Collection {
                kind: CollectionKind::HashSet,
                element: TypeRef::of::<String>(),
            }
        );
    }

    #[test]
    fn test_factory_rejects_unregistered_kind() {
        let factory = CollectionFactory::new([CollectionKind::List]);
        assert!(factory.ensure_recognized(&CollectionKind::List, "items").is_ok());

        let err = factory
            .ensure_recognized(&CollectionKind::Custom("ring".to_string()), "items")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `items` uses unsupported collection kind `custom(ring)`"
        );
    }

    #[test]
    fn test_factory_builds_fresh_elements() {
        let factory = CollectionFactory::default();
        let element = factory.new_element(&TypeRef::of::<String>()).unwrap();
        assert_eq!(element.as_any().downcast_ref::<String>(), Some(&String::new()));
    }

    #[test]
    fn test_collection_kind_serde_names() {
        let json = serde_json::to_string(&CollectionKind::LinkedList).unwrap();
        assert_eq!(json, "\"linked_list\"");
        let kind: CollectionKind = serde_json::from_str("{\"custom\":\"ring\"}").unwrap();
        assert_eq!(kind, CollectionKind::Custom("ring".to_string()));
    }
}
