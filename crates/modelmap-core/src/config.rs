//! Mapper configuration
//!
//! [`MapperConfig`] holds the serializable knobs of a [`Mapper`](crate::Mapper).
//! Leaf-type overrides are type-level and therefore only available through
//! [`MapperBuilder::leaf_type`](crate::MapperBuilder::leaf_type).

use crate::collection::CollectionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Default recursion ceiling
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Errors raised while loading or validating a [`MapperConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("max_depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),

    #[error("failed to parse mapper configuration")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
}

/// Serializable mapper settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Maximum nesting of structured values before the call fails
    pub max_depth: usize,
    /// Collection kinds the element factory accepts
    pub collection_kinds: BTreeSet<CollectionKind>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            collection_kinds: CollectionKind::standard(),
        }
    }
}

impl MapperConfig {
    /// Parse and validate a JSON document; omitted keys take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MapperConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}
