//! Declarative per-field configuration on destination types
//!
//! Directives are attached to destination fields inside a
//! [`mappable!`](crate::mappable) invocation and resolved into the type's
//! cached [`TypeDescriptor`](crate::TypeDescriptor):
//!
//! ```
//! use modelmap_core::{mappable, Directive, StringToUuidAdapter};
//! use uuid::Uuid;
//!
//! mappable! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct TicketDto {
//!         pub requester_id: Uuid => [Directive::transform::<StringToUuidAdapter>()],
//!         pub title: String => [Directive::redirect(&["subject", "headline"])],
//!     }
//! }
//! ```

use crate::adapter::{AdapterRef, TypeAdapter};

/// Configuration attached to one destination field
#[derive(Debug, Clone)]
pub enum Directive {
    /// Redirect unmatched source leaf fields into this field
    Redirect(FieldMapping),
    /// Convert values through a type adapter before assignment
    Transform(AdapterRef),
}

impl Directive {
    /// Field directive: source fields with any of these names, and no
    /// same-named destination field, are copied into this field.
    pub fn redirect(source_fields: &[&'static str]) -> Self {
        Directive::Redirect(FieldMapping::new(source_fields.iter().copied()))
    }

    /// Transform directive applying adapter `A`
    pub fn transform<A: TypeAdapter>() -> Self {
        Directive::Transform(AdapterRef::new::<A>())
    }
}

/// Set of source field names redirected into one destination field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    source_fields: Vec<&'static str>,
}

impl FieldMapping {
    pub fn new(source_fields: impl IntoIterator<Item = &'static str>) -> Self {
        let mut mapping = Self::default();
        for name in source_fields {
            if !mapping.source_fields.contains(&name) {
                mapping.source_fields.push(name);
            }
        }
        mapping
    }

    pub fn source_fields(&self) -> &[&'static str] {
        &self.source_fields
    }

    /// Whether `source_field` is one of the redirected names
    pub fn names(&self, source_field: &str) -> bool {
        self.source_fields.iter().any(|name| *name == source_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::IntegerToStringAdapter;
    use crate::descriptor::FieldDescriptor;
    use crate::StringToUuidAdapter;

    #[test]
    fn test_field_mapping_deduplicates() {
        let mapping = FieldMapping::new(["full_name", "name", "full_name"]);
        assert_eq!(mapping.source_fields(), &["full_name", "name"]);
        assert!(mapping.names("name"));
        assert!(!mapping.names("nickname"));
    }

    #[test]
    fn test_descriptor_resolves_redirect() {
        let field = FieldDescriptor::of::<String>("label")
            .with_directive(Directive::redirect(&["title", "caption"]));
        assert!(field.redirects_from("caption"));
        assert!(!field.redirects_from("label"));
        assert!(field.adapter().is_none());
    }

    #[test]
    fn test_second_transform_is_ignored() {
        let field = FieldDescriptor::of::<String>("value")
            .with_directive(Directive::transform::<IntegerToStringAdapter>())
            .with_directive(Directive::transform::<StringToUuidAdapter>());
        assert_eq!(field.directives().len(), 1);
        assert_eq!(
            field.adapter().map(AdapterRef::name),
            Some(std::any::type_name::<IntegerToStringAdapter>())
        );
    }
}
