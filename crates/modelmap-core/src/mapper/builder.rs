//! Builder for configuring a [`Mapper`]
//!
//! This module provides a fluent builder API for setting the recursion
//! ceiling, the recognized collection kinds and leaf-type overrides.

use super::Mapper;
use crate::classify::LeafTypes;
use crate::collection::CollectionKind;
use crate::config::{ConfigError, MapperConfig};
use crate::reflect::Mappable;

/// Builder for creating mappers
#[derive(Debug, Clone, Default)]
pub struct MapperBuilder {
    config: MapperConfig,
    leaves: LeafTypes,
}

impl MapperBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration, keeping registered leaf types
    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the recursion ceiling
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Copy values of type `T` atomically instead of recursing into them
    pub fn leaf_type<T: Mappable>(mut self) -> Self {
        self.leaves.insert::<T>();
        self
    }

    /// Accept an additional collection kind
    pub fn collection_kind(mut self, kind: CollectionKind) -> Self {
        self.config.collection_kinds.insert(kind);
        self
    }

    /// Stop accepting a collection kind
    pub fn without_collection_kind(mut self, kind: &CollectionKind) -> Self {
        self.config.collection_kinds.remove(kind);
        self
    }

    /// Validate the configuration and build the mapper
    pub fn build(self) -> Result<Mapper, ConfigError> {
        self.config.validate()?;
        Ok(Mapper::from_parts(self.config, self.leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_config_defaults() {
        let mapper = MapperBuilder::new().build().unwrap();
        assert_eq!(mapper.config(), &MapperConfig::default());
    }

    #[test]
    fn test_builder_collection_kinds() {
        let ring = CollectionKind::Custom("ring".to_string());
        let mapper = Mapper::builder()
            .collection_kind(ring.clone())
            .without_collection_kind(&CollectionKind::LinkedList)
            .build()
            .unwrap();
        assert!(mapper.collections().recognizes(&ring));
        assert!(!mapper.collections().recognizes(&CollectionKind::LinkedList));
    }

    #[test]
    fn test_builder_rejects_zero_depth() {
        let err = Mapper::builder().max_depth(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxDepth(0)));
    }

    #[test]
    fn test_builder_registers_leaf_override() {
        let mapper = Mapper::builder().leaf_type::<String>().build().unwrap();
        assert_eq!(mapper.leaf_types().overrides().count(), 1);
    }
}
