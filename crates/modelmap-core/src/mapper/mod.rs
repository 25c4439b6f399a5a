//! Mapper facade
//!
//! [`Mapper`] is the public entry point: it allocates the destination through
//! its registered constructor, runs the recursive engine and wraps any
//! failure into the boundary [`Error`].
//!
//! A mapper is immutable after construction and can be shared across threads.
//!
//! # Examples
//!
//! ```
//! use modelmap_core::{mappable, Mapper};
//!
//! mappable! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct User {
//!         pub name: String,
//!         pub age: i32,
//!     }
//! }
//!
//! mappable! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct UserDto {
//!         pub name: String,
//!         pub age: i32,
//!     }
//! }
//!
//! let user = User { name: "Ada".into(), age: 36 };
//! let dto: UserDto = Mapper::new().map(&user).unwrap();
//! assert_eq!(dto, UserDto { name: "Ada".into(), age: 36 });
//! ```
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub(crate) mod engine;


pub use builder::MapperBuilder;

use crate::classify::LeafTypes;
use crate::collection::CollectionFactory;
use crate::config::{ConfigError, MapperConfig};
use crate::error::{Error, MappingError, Result};
use crate::path::FieldPath;
use crate::reflect::{downcast, Mappable};
use engine::Engine;
use std::any::type_name;
use tracing::{error, instrument};

/// Recursive object-graph mapper
#[derive(Debug, Clone)]
pub struct Mapper {
    config: MapperConfig,
    leaves: LeafTypes,
    collections: CollectionFactory,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::from_parts(MapperConfig::default(), LeafTypes::new())
    }
}

impl Mapper {
    /// Mapper with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MapperBuilder {
        MapperBuilder::new()
    }

    /// Mapper with a validated configuration
    pub fn with_config(config: MapperConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, LeafTypes::new()))
    }

    pub(crate) fn from_parts(config: MapperConfig, leaves: LeafTypes) -> Self {
        let collections = CollectionFactory::new(config.collection_kinds.iter().cloned());
        Self {
            config,
            leaves,
            collections,
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn leaf_types(&self) -> &LeafTypes {
        &self.leaves
    }

    pub fn collections(&self) -> &CollectionFactory {
        &self.collections
    }

    /// Build a new `D` populated from `source`
    #[instrument(level = "debug", skip_all, fields(
        source = source.descriptor().name(),
        destination = type_name::<D>(),
    ))]
    pub fn map<D: Mappable>(&self, source: &dyn Mappable) -> Result<D> {
        let mut destination =
            instantiate::<D>().map_err(|cause| self.fail(cause, FieldPath::root()))?;
        self.run(source, &mut destination)?;
        Ok(destination)
    }

    /// Like [`map`](Self::map), failing with
    /// [`MappingError::NullInput`] when the source is absent
    pub fn map_optional<D: Mappable>(&self, source: Option<&dyn Mappable>) -> Result<D> {
        match source {
            Some(source) => self.map(source),
            None => Err(self.fail(MappingError::NullInput, FieldPath::root())),
        }
    }

    /// Populate an existing destination from `source`.
    ///
    /// Destination fields with no source counterpart keep their values. On
    /// failure the destination may be partially written.
    #[instrument(level = "debug", skip_all, fields(
        source = source.descriptor().name(),
        destination = destination.descriptor().name(),
    ))]
    pub fn map_into(&self, source: &dyn Mappable, destination: &mut dyn Mappable) -> Result<()> {
        self.run(source, destination)
    }

    /// Map every source in order, stopping at the first failure
    pub fn map_all<'a, S, D>(&self, sources: impl IntoIterator<Item = &'a S>) -> Result<Vec<D>>
    where
        S: Mappable,
        D: Mappable,
    {
        sources
            .into_iter()
            .map(|source| self.map::<D>(source))
            .collect()
    }

    fn run(&self, source: &dyn Mappable, destination: &mut dyn Mappable) -> Result<()> {
        let mut engine = Engine::new(&self.leaves, &self.collections, self.config.max_depth);
        engine
            .copy_fields(source, destination, 0)
            .map_err(|cause| self.fail(cause, engine.into_path()))
    }

    fn fail(&self, cause: MappingError, path: FieldPath) -> Error {
        error!(path = %path, error = %cause, "error occurred while mapping entity");
        Error::new(cause, path)
    }
}

fn instantiate<D: Mappable>() -> std::result::Result<D, MappingError> {
    let descriptor = D::type_descriptor();
    let instance = descriptor.instantiate()?;
    downcast::<D>(instance).map_err(|mismatch| {
        MappingError::uninstantiable(
            descriptor.name(),
            format!("constructor produced `{}`", mismatch.found),
        )
    })
}
