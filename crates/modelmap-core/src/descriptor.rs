//! Static type and field metadata
//!
//! A [`TypeDescriptor`] is the reflection table for one type: its name, whether
//! it is a leaf or a structured type, its field descriptors (with their
//! directives) and the zero-argument constructor used to instantiate it.
//! Descriptors are built once per type, leaked into a process-wide cache and
//! never mutated afterwards.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::adapter::AdapterRef;
use crate::collection::CollectionKind;
use crate::directive::Directive;
use crate::error::MappingError;
use crate::reflect::{Field, Mappable};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Zero-argument constructor for a mappable type
pub type Constructor = fn() -> anyhow::Result<Box<dyn Mappable>>;

/// Whether the engine copies a type atomically or recurses into its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Leaf,
    Structured,
}

/// Lazy reference to another type's descriptor
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    descriptor: fn() -> &'static TypeDescriptor,
}

impl TypeRef {
    pub fn of<T: Mappable>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            descriptor: <T as Mappable>::type_descriptor,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Resolve the referenced descriptor. Resolution is deferred so that
    /// self-referential types can describe themselves.
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        (self.descriptor)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared shape of a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// `T`
    Single(TypeRef),
    /// `Option<T>`
    Optional(TypeRef),
    /// `Vec<T>`, `HashSet<T>`, ...
    Collection {
        kind: CollectionKind,
        element: TypeRef,
    },
}

impl FieldShape {
    /// Declared value type of a single or optional field
    pub fn value_type(&self) -> Option<&TypeRef> {
        match self {
            FieldShape::Single(ty) | FieldShape::Optional(ty) => Some(ty),
            FieldShape::Collection { .. } => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, FieldShape::Collection { .. })
    }
}

/// Metadata for one field of one type
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    shape: FieldShape,
    directives: Vec<Directive>,
}

impl FieldDescriptor {
    /// Describe a field of Rust type `F`
    pub fn of<F: Field>(name: &'static str) -> Self {
        Self {
            name,
            shape: F::shape(),
            directives: Vec::new(),
        }
    }

    /// Attach a directive.
    ///
    /// A field carries at most one Transform directive; later ones are ignored.
    pub fn with_directive(mut self, directive: Directive) -> Self {
        if let Directive::Transform(adapter) = &directive {
            if let Some(existing) = self.adapter() {
                tracing::warn!(
                    field = self.name,
                    kept = existing.name(),
                    ignored = adapter.name(),
                    "field already has a type adapter; ignoring additional transform directive"
                );
                return self;
            }
        }
        self.directives.push(directive);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &FieldShape {
        &self.shape
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// The Transform directive's adapter, if any
    pub fn adapter(&self) -> Option<&AdapterRef> {
        self.directives.iter().find_map(|directive| match directive {
            Directive::Transform(adapter) => Some(adapter),
            Directive::Redirect(_) => None,
        })
    }

    /// Whether a Field directive redirects `source_field` into this field
    pub fn redirects_from(&self, source_field: &str) -> bool {
        self.directives.iter().any(|directive| match directive {
            Directive::Redirect(mapping) => mapping.names(source_field),
            Directive::Transform(_) => false,
        })
    }
}

/// Reflection table for one type
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    kind: TypeKind,
    fields: Vec<FieldDescriptor>,
    constructor: Option<Constructor>,
}

impl TypeDescriptor {
    /// Descriptor for an atomic value constructed with `Default`
    pub fn leaf<T: Mappable + Default>() -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Leaf,
            fields: Vec::new(),
            constructor: Some(construct_default::<T> as Constructor),
        }
    }

    /// Descriptor for a struct constructed with `Default`
    pub fn structured<T: Mappable + Default>(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind: TypeKind::Structured,
            fields,
            constructor: Some(construct_default::<T> as Constructor),
        }
    }

    /// Descriptor for a type with a custom constructor, or none at all
    pub fn with_constructor<T: Mappable>(
        kind: TypeKind,
        fields: Vec<FieldDescriptor>,
        constructor: Option<Constructor>,
    ) -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            kind,
            fields,
            constructor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field with the given name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Every field whose Field directive redirects `source_field` into it
    pub fn redirect_targets<'a>(
        &'a self,
        source_field: &'a str,
    ) -> impl Iterator<Item = &'a FieldDescriptor> + 'a {
        self.fields
            .iter()
            .filter(move |field| field.redirects_from(source_field))
    }

    /// Build a fresh instance through the zero-argument constructor
    pub fn instantiate(&self) -> Result<Box<dyn Mappable>, MappingError> {
        let constructor = self.constructor.ok_or_else(|| {
            MappingError::uninstantiable(self.name, "no zero-argument constructor registered")
        })?;
        let instance = constructor().map_err(|err| MappingError::UninstantiableType {
            type_name: self.name,
            reason: "constructor failed".to_string(),
            source: Some(err),
        })?;
        if instance.descriptor().type_id() != self.type_id {
            return Err(MappingError::uninstantiable(
                self.name,
                format!("constructor produced `{}`", instance.descriptor().name()),
            ));
        }
        Ok(instance)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}

fn construct_default<T: Mappable + Default>() -> anyhow::Result<Box<dyn Mappable>> {
    Ok(Box::new(T::default()))
}

type DescriptorCache = RwLock<HashMap<TypeId, &'static TypeDescriptor>>;

fn descriptor_cache() -> &'static DescriptorCache {
    static CACHE: OnceLock<DescriptorCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Return the cached descriptor for `T`, building it on first use.
///
/// `build` runs without the cache lock held, so it may resolve other
/// descriptors. When two threads race, the first insert wins.
pub fn cached<T: 'static>(build: impl FnOnce() -> TypeDescriptor) -> &'static TypeDescriptor {
    let id = TypeId::of::<T>();
    if let Some(descriptor) = descriptor_cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied()
    {
        return descriptor;
    }

    let built = build();
    let mut cache = descriptor_cache()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(descriptor) = cache.get(&id).copied() {
        return descriptor;
    }
    let descriptor: &'static TypeDescriptor = Box::leak(Box::new(built));
    cache.insert(id, descriptor);
    tracing::trace!(type_name = descriptor.name(), "cached type descriptor");
    descriptor
}
