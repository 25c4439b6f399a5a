//! Type adapters for Transform directives
//!
//! A [`TypeAdapter`] bridges a source leaf type and an incompatible destination
//! leaf type. Adapters are stateless, default-constructible and expose a single
//! conversion. The engine only calls an adapter when the source value's type
//! differs from the destination field's declared type.
//!
//! # Module Organization
//!
//! - [`built_in`] - Adapters shipped with the crate
//! - `tests` - Adapter test suite
//!
//! # Examples
//!
//! ```
//! use modelmap_core::{AdapterRef, StringToUuidAdapter};
//!
//! let adapter = AdapterRef::new::<StringToUuidAdapter>();
//! let id = String::from("a0200f66-f5b2-4cc7-accd-9810f1b1471f");
//! let converted = adapter.convert(&id).unwrap();
//! assert!(converted.as_any().is::<uuid::Uuid>());
//! ```
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

pub mod built_in;


pub use built_in::{
    IntegerToStringAdapter, LongToStringAdapter, StringToDateAdapter, StringToLongAdapter,
    StringToUuidAdapter, UuidToStringAdapter,
};

use crate::descriptor::TypeRef;
use crate::reflect::Mappable;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by type adapters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// Adapters never accept an absent value
    #[error("type adapter input is required and cannot be absent")]
    NullInput,

    /// The value handed to the adapter is not its input type
    #[error("type adapter expects `{expected}` but received `{found}`")]
    InputType {
        expected: &'static str,
        found: &'static str,
    },

    /// The input could not be converted
    #[error("cannot convert {value:?} to {target}: {message}")]
    Conversion {
        value: String,
        target: &'static str,
        message: String,
    },
}

impl AdapterError {
    pub fn conversion(
        value: impl fmt::Debug,
        target: &'static str,
        message: impl fmt::Display,
    ) -> Self {
        AdapterError::Conversion {
            value: format!("{value:?}"),
            target,
            message: message.to_string(),
        }
    }
}

/// Stateless converter from one leaf type to another
pub trait TypeAdapter: Default + Send + Sync + 'static {
    type Input: Mappable;
    type Output: Mappable;

    fn convert(&self, input: &Self::Input) -> Result<Self::Output, AdapterError>;
}

trait ErasedAdapter: Send + Sync {
    fn apply(&self, input: &dyn Mappable) -> Result<Box<dyn Mappable>, AdapterError>;
}

struct Erased<A>(A);

impl<A: TypeAdapter> ErasedAdapter for Erased<A> {
    fn apply(&self, input: &dyn Mappable) -> Result<Box<dyn Mappable>, AdapterError> {
        let typed = input
            .as_any()
            .downcast_ref::<A::Input>()
            .ok_or_else(|| AdapterError::InputType {
                expected: type_name::<A::Input>(),
                found: input.descriptor().name(),
            })?;
        let output = self.0.convert(typed)?;
        Ok(Box::new(output))
    }
}

/// Type-erased adapter instance held by a Transform directive
#[derive(Clone)]
pub struct AdapterRef {
    name: &'static str,
    input: TypeRef,
    output: TypeRef,
    adapter: Arc<dyn ErasedAdapter>,
}

impl AdapterRef {
    /// Instantiate adapter `A` through its zero-argument constructor
    pub fn new<A: TypeAdapter>() -> Self {
        Self {
            name: type_name::<A>(),
            input: TypeRef::of::<A::Input>(),
            output: TypeRef::of::<A::Output>(),
            adapter: Arc::new(Erased(A::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn input(&self) -> &TypeRef {
        &self.input
    }

    pub fn output(&self) -> &TypeRef {
        &self.output
    }

    /// Convert a value, rejecting absent input
    pub fn apply(&self, input: Option<&dyn Mappable>) -> Result<Box<dyn Mappable>, AdapterError> {
        let input = input.ok_or(AdapterError::NullInput)?;
        self.adapter.apply(input)
    }

    pub fn convert(&self, input: &dyn Mappable) -> Result<Box<dyn Mappable>, AdapterError> {
        self.adapter.apply(input)
    }
}

impl fmt::Debug for AdapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRef")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}
