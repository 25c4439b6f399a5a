//! Error types for the modelmap core library
//!
//! Every failure inside a mapping call is reported through a single boundary
//! type, [`Error`], whose [`source`](std::error::Error::source) is the
//! [`MappingError`] that aborted the call. Unmatched destination fields are not
//! errors; they are logged and skipped.
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

use crate::adapter::AdapterError;
use crate::collection::CollectionKind;
use crate::path::FieldPath;
use thiserror::Error;

/// Message carried by every boundary error
pub const MAPPING_FAILED: &str = "error occurred while mapping entity";

/// Boundary error returned by every public mapping entry point
#[derive(Error, Debug)]
#[error("{}", MAPPING_FAILED)]
pub struct Error {
    /// Source field path that was being copied when the failure happened
    path: FieldPath,
    #[source]
    cause: MappingError,
}

/// Root cause of a failed mapping call
#[derive(Error, Debug)]
pub enum MappingError {
    /// Source object absent at the top-level call
    #[error("source object is required and cannot be absent")]
    NullInput,

    /// A destination type could not be constructed
    #[error("cannot instantiate `{type_name}`: {reason}")]
    UninstantiableType {
        type_name: &'static str,
        reason: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A leaf value cannot be assigned to the destination field
    #[error("cannot assign value of type `{found}` to field `{field}` declared as `{expected}`")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The destination collection kind is not registered with the factory
    #[error("field `{field}` uses unsupported collection kind `{kind}`")]
    UnsupportedCollectionKind { field: String, kind: CollectionKind },

    /// A Transform directive's adapter rejected the value
    #[error("type adapter `{adapter}` failed for field `{field}`")]
    Adapter {
        field: String,
        adapter: &'static str,
        #[source]
        source: AdapterError,
    },

    /// Recursion went deeper than the configured ceiling
    #[error("recursion depth limit of {limit} exceeded; the source graph may contain a cycle")]
    DepthExceeded { limit: usize },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn new(cause: MappingError, path: FieldPath) -> Self {
        Self { path, cause }
    }

    /// The failure that aborted the mapping call
    pub fn cause(&self) -> &MappingError {
        &self.cause
    }

    /// Source field path being copied when the failure happened.
    ///
    /// Empty when the failure happened before any field was visited.
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Consume the wrapper and return the cause
    pub fn into_cause(self) -> MappingError {
        self.cause
    }
}

impl MappingError {
    pub(crate) fn uninstantiable(type_name: &'static str, reason: impl Into<String>) -> Self {
        MappingError::UninstantiableType {
            type_name,
            reason: reason.into(),
            source: None,
        }
    }

    /// Whether this is an illegal-argument style failure (value rejected at assignment)
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, MappingError::TypeMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_boundary_message_is_stable() {
        let err = Error::new(MappingError::NullInput, FieldPath::root());
        assert_eq!(err.to_string(), MAPPING_FAILED);
        assert_eq!(err.to_string(), "error occurred while mapping entity");
        assert!(err.path().is_root());
    }

    #[test]
    fn test_source_exposes_cause() {
        let err = Error::new(
            MappingError::TypeMismatch {
                field: "value".to_string(),
                expected: "alloc::string::String",
                found: "i64",
            },
            FieldPath::root(),
        );
        let source = err.source().expect("cause should be exposed as source");
        assert!(source.to_string().contains("`value`"));
        assert!(err.cause().is_type_mismatch());
    }

    #[test]
    fn test_uninstantiable_display() {
        let err = MappingError::uninstantiable("Widget", "no zero-argument constructor registered");
        assert_eq!(
            err.to_string(),
            "cannot instantiate `Widget`: no zero-argument constructor registered"
        );
    }
}
