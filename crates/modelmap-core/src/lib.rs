//! Modelmap Core - Recursive object-graph mapping between entities and DTOs
//!
//! This crate copies a source object graph into a new instance of a
//! destination type by matching fields by name, recursing into nested
//! structures and collections. Divergent names and types are bridged with
//! per-field directives instead of hand-written conversion code.
//!
//! # Main Components
//!
//! - **Reflection**: `Mappable` and `Field` traits, generated by `mappable!` and `leaf_type!`
//! - **Descriptors**: Cached per-type field tables carrying directives
//! - **Directives**: Field redirects and Transform adapters on destination fields
//! - **Collections**: Element-wise copying into `Vec`, `VecDeque`, sets and more
//! - **Mapper**: The facade running the recursive engine
//! - **Error Handling**: Boundary error with the source field path, using `thiserror` and `anyhow`
//!
//! # Example
//!
//! ```
//! use modelmap_core::{mappable, Directive, LongToStringAdapter};
//!
//! mappable! {
//!     #[derive(Debug, Clone, Default)]
//!     pub struct Order {
//!         pub id: i64,
//!         pub customer: String,
//!     }
//! }
//!
//! mappable! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct OrderDto {
//!         pub id: String => [Directive::transform::<LongToStringAdapter>()],
//!         pub buyer: String => [Directive::redirect(&["customer"])],
//!     }
//! }
//!
//! fn example() -> modelmap_core::Result<()> {
//!     let order = Order { id: 42, customer: "Grace".into() };
//!     let dto: OrderDto = modelmap_core::map(&order)?;
//!     assert_eq!(dto, OrderDto { id: "42".into(), buyer: "Grace".into() });
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Modelmap Team
//! Licensed under the Apache-2.0 license

pub mod adapter;
mod builtin;
pub mod classify;
pub mod collection;
pub mod config;
pub mod descriptor;
pub mod directive;
pub mod error;
mod macros;
pub mod mapper;
pub mod path;
pub mod reflect;

// Re-export main types for convenience
pub use adapter::{
    AdapterError, AdapterRef, IntegerToStringAdapter, LongToStringAdapter, StringToDateAdapter,
    StringToLongAdapter, StringToUuidAdapter, TypeAdapter, UuidToStringAdapter,
};
pub use classify::LeafTypes;
pub use collection::{CollectionFactory, CollectionKind, DynCollection};
pub use config::{ConfigError, MapperConfig, DEFAULT_MAX_DEPTH};
pub use descriptor::{FieldDescriptor, FieldShape, TypeDescriptor, TypeKind, TypeRef};
pub use directive::{Directive, FieldMapping};
pub use error::{Error, MappingError, Result, MAPPING_FAILED};
pub use mapper::{Mapper, MapperBuilder};
pub use path::{FieldPath, PathSegment};
pub use reflect::{Field, FieldRef, Mappable, Mismatch};

use std::sync::OnceLock;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn default_mapper() -> &'static Mapper {
    static DEFAULT: OnceLock<Mapper> = OnceLock::new();
    DEFAULT.get_or_init(Mapper::new)
}

/// Map `source` into a new `D` with the default [`Mapper`]
pub fn map<D: Mappable>(source: &dyn Mappable) -> Result<D> {
    default_mapper().map(source)
}
