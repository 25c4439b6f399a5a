//! Recursive field-copy engine
//!
//! One [`Engine`] runs per mapping call. It walks the source graph depth-first
//! in field declaration order and writes into the destination graph:
//!
//! - absent values are skipped and never overwrite destination fields
//! - leaf values are copied by name, converted through the destination field's
//!   type adapter when the types differ, or redirected into fields whose
//!   Field directive names them
//! - structured values get a fresh destination instance that is filled
//!   recursively, or are flattened into the current destination when it has no
//!   same-named field
//! - collections are appended to element by element in source order
//!
//! The engine keeps the source path of the field being copied. On failure the
//! path is left as it was at the failing field, which is what the boundary
//! error reports.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::classify::LeafTypes;
use crate::collection::{CollectionFactory, DynCollection};
use crate::descriptor::{FieldDescriptor, FieldShape, TypeRef};
use crate::error::MappingError;
use crate::path::FieldPath;
use crate::reflect::{FieldRef, Mappable, Mismatch};
use tracing::{debug, trace, warn};

pub(crate) struct Engine<'m> {
    leaves: &'m LeafTypes,
    collections: &'m CollectionFactory,
    max_depth: usize,
    path: FieldPath,
}

impl<'m> Engine<'m> {
    pub(crate) fn new(
        leaves: &'m LeafTypes,
        collections: &'m CollectionFactory,
        max_depth: usize,
    ) -> Self {
        Self {
            leaves,
            collections,
            max_depth,
            path: FieldPath::root(),
        }
    }

    /// Source path of the field being copied
    pub(crate) fn into_path(self) -> FieldPath {
        self.path
    }

    /// Copy every field of `source` into `destination`.
    ///
    /// `depth` counts the structured values entered so far; the root is 0.
    pub(crate) fn copy_fields(
        &mut self,
        source: &dyn Mappable,
        destination: &mut dyn Mappable,
        depth: usize,
    ) -> Result<(), MappingError> {
        if self.leaves.is_leaf(source) {
            return Ok(());
        }
        let source_type = source.descriptor();
        if source_type.fields().is_empty() {
            return Ok(());
        }
        if depth >= self.max_depth {
            return Err(MappingError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        for field in source_type.fields() {
            let Some(slot) = source.field(field.name()) else {
                debug!(
                    source = source_type.name(),
                    field = field.name(),
                    "described field is not readable, skipping"
                );
                continue;
            };

            self.path.push_field(field.name());
            match slot.read() {
                FieldRef::Absent => {
                    trace!(field = field.name(), "source value absent, skipping");
                }
                FieldRef::Value(value) => {
                    self.copy_value(field.name(), value, destination, depth)?;
                }
                FieldRef::Collection(items) => {
                    self.copy_collection(field.name(), items, destination, depth)?;
                }
            }
            self.path.pop();
        }
        Ok(())
    }

    fn copy_value(
        &mut self,
        name: &'static str,
        value: &dyn Mappable,
        destination: &mut dyn Mappable,
        depth: usize,
    ) -> Result<(), MappingError> {
        let destination_type = destination.descriptor();
        let Some(target) = destination_type.field(name) else {
            if self.leaves.is_leaf(value) {
                return self.redirect(name, value, destination);
            }
            debug!(
                field = name,
                destination = destination_type.name(),
                "no matching destination field, flattening structured value into parent"
            );
            return self.copy_fields(value, destination, depth + 1);
        };

        let declared = match target.shape() {
            FieldShape::Single(declared) | FieldShape::Optional(declared) => declared,
            FieldShape::Collection { .. } => {
                return Err(MappingError::TypeMismatch {
                    field: name.to_string(),
                    expected: "collection",
                    found: value.descriptor().name(),
                });
            }
        };

        let converted = if self.copies_atomically(value, declared) {
            self.convert_leaf(value, target)?
        } else {
            let mut nested = declared.descriptor().instantiate()?;
            self.copy_fields(value, &mut *nested, depth + 1)?;
            nested
        };
        trace!(field = name, "copied field");
        assign(destination, target, converted)
    }

    /// Copy a leaf with no same-named destination field into every field whose
    /// Field directive names it
    fn redirect(
        &mut self,
        name: &'static str,
        value: &dyn Mappable,
        destination: &mut dyn Mappable,
    ) -> Result<(), MappingError> {
        let destination_type = destination.descriptor();
        let mut redirected = false;
        for target in destination_type.redirect_targets(name) {
            let converted = self.convert_leaf(value, target)?;
            assign(destination, target, converted)?;
            trace!(from = name, to = target.name(), "redirected field");
            redirected = true;
        }
        if !redirected {
            warn!(destination = destination_type.name(), "field {} not found", name);
        }
        Ok(())
    }

    fn copy_collection(
        &mut self,
        name: &'static str,
        items: &dyn DynCollection,
        destination: &mut dyn Mappable,
        depth: usize,
    ) -> Result<(), MappingError> {
        let destination_type = destination.descriptor();
        let Some(target) = destination_type.field(name) else {
            warn!(destination = destination_type.name(), "field {} not found", name);
            return Ok(());
        };
        let FieldShape::Collection { kind, element } = target.shape() else {
            debug!(
                field = name,
                destination = destination_type.name(),
                "destination field is not a collection, skipping"
            );
            return Ok(());
        };
        if items.is_empty() {
            return Ok(());
        }
        self.collections.ensure_recognized(kind, name)?;

        let Some(collection) = destination
            .field_mut(name)
            .and_then(|slot| slot.as_collection_mut())
        else {
            debug!(field = name, "destination collection is not writable, skipping");
            return Ok(());
        };

        for (index, item) in items.elements().enumerate() {
            self.path.push_index(index);
            let converted = if self.copies_atomically(item, element) {
                self.convert_leaf(item, target)?
            } else {
                let mut fresh = self.collections.new_element(element)?;
                self.copy_fields(item, &mut *fresh, depth + 1)?;
                fresh
            };
            collection
                .insert_element(converted)
                .map_err(|mismatch| type_mismatch(target, mismatch))?;
            self.path.pop();
        }
        trace!(field = name, count = items.len(), "copied collection");
        Ok(())
    }

    /// Whether `value` is copied as a whole into a slot declared as `declared`
    fn copies_atomically(&self, value: &dyn Mappable, declared: &TypeRef) -> bool {
        self.leaves.is_leaf(value) || self.leaves.is_leaf_type(declared.descriptor())
    }

    /// Copy a leaf for `target`, converting it through the field's adapter when
    /// its type differs from the declared one
    fn convert_leaf(
        &self,
        value: &dyn Mappable,
        target: &FieldDescriptor,
    ) -> Result<Box<dyn Mappable>, MappingError> {
        let declared = match target.shape() {
            FieldShape::Single(declared) | FieldShape::Optional(declared) => declared,
            FieldShape::Collection { element, .. } => element,
        };
        let found = value.descriptor();
        if found.type_id() == declared.id() {
            return Ok(value.clone_boxed());
        }

        match target.adapter() {
            Some(adapter) => {
                trace!(
                    field = target.name(),
                    adapter = adapter.name(),
                    "converting through type adapter"
                );
                adapter
                    .convert(value)
                    .map_err(|source| MappingError::Adapter {
                        field: target.name().to_string(),
                        adapter: adapter.name(),
                        source,
                    })
            }
            None => Err(MappingError::TypeMismatch {
                field: target.name().to_string(),
                expected: declared.name(),
                found: found.name(),
            }),
        }
    }
}

fn assign(
    destination: &mut dyn Mappable,
    target: &FieldDescriptor,
    value: Box<dyn Mappable>,
) -> Result<(), MappingError> {
    let destination_name = destination.descriptor().name();
    let Some(slot) = destination.field_mut(target.name()) else {
        warn!(destination = destination_name, "field {} not found", target.name());
        return Ok(());
    };
    slot.assign(value)
        .map_err(|mismatch| type_mismatch(target, mismatch))
}

fn type_mismatch(target: &FieldDescriptor, mismatch: Mismatch) -> MappingError {
    MappingError::TypeMismatch {
        field: target.name().to_string(),
        expected: mismatch.expected,
        found: mismatch.found,
    }
}
