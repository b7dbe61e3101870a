//! Well-known type resolution
//!
//! Generated schemas reference `google.protobuf.Timestamp`,
//! `google.protobuf.FieldMask` and `google.protobuf.Empty`. They are looked up
//! in a prost-reflect [`DescriptorPool`] so the renderer can import the file
//! that actually declares them.

use prost_reflect::DescriptorPool;

use crate::error::GeneratorError;
use crate::ir::TypeRef;

/// Well-known types the generator can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnownType {
    Timestamp,
    FieldMask,
    Empty,
}

impl WellKnownType {
    /// Fully qualified protobuf name
    pub fn full_name(&self) -> &'static str {
        match self {
            WellKnownType::Timestamp => "google.protobuf.Timestamp",
            WellKnownType::FieldMask => "google.protobuf.FieldMask",
            WellKnownType::Empty => "google.protobuf.Empty",
        }
    }
}

/// The pool used when the caller does not provide one
///
/// This is prost-reflect's global pool, which ships the google well-known
/// types. The returned handle is a cheap reference-counted clone.
pub fn default_pool() -> DescriptorPool {
    DescriptorPool::global()
}

/// Resolve a well-known type in the given pool
pub fn resolve(pool: &DescriptorPool, wkt: WellKnownType) -> Result<TypeRef, GeneratorError> {
    let message = pool
        .get_message_by_name(wkt.full_name())
        .ok_or(GeneratorError::WellKnownType {
            type_name: wkt.full_name(),
        })?;

    let file = message.parent_file();
    tracing::trace!(
        type_name = message.full_name(),
        file = file.name(),
        "resolved well-known type"
    );

    Ok(TypeRef::WellKnown {
        full_name: message.full_name().to_string(),
        file: file.name().to_string(),
    })
}
