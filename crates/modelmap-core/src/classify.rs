//! Leaf classification table
//!
//! A value is a leaf when its descriptor is [`TypeKind::Leaf`] or when its type
//! was registered as a leaf override on the mapper. Overrides let a caller copy
//! a structured type atomically instead of recursing into it.

use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::reflect::Mappable;
use std::any::TypeId;
use std::collections::HashMap;

/// Types the engine copies atomically
#[derive(Debug, Clone, Default)]
pub struct LeafTypes {
    overrides: HashMap<TypeId, &'static str>,
}

impl LeafTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `T` as a leaf even if its descriptor is structured
    pub fn insert<T: Mappable>(&mut self) {
        let descriptor = T::type_descriptor();
        self.overrides
            .insert(descriptor.type_id(), descriptor.name());
    }

    pub fn is_leaf(&self, value: &dyn Mappable) -> bool {
        self.is_leaf_type(value.descriptor())
    }

    pub fn is_leaf_type(&self, descriptor: &TypeDescriptor) -> bool {
        descriptor.kind() == TypeKind::Leaf || self.overrides.contains_key(&descriptor.type_id())
    }

    /// Names of the registered overrides
    pub fn overrides(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.overrides.values().copied()
    }
}
