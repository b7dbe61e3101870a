//! The resource message

use prost_reflect::DescriptorPool;

use crate::annotations::{ResourceDescriptor, identifier, optional, output_only, resource};
use crate::config::ResourceConfig;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MessageShape, ScalarType};
use crate::well_known::{self, WellKnownType};

/// Build the resource message
///
/// `name` is always present; `display_name`, the timestamp pair and
/// `annotations` follow in that order when enabled.
pub(super) fn build(
    cfg: &ResourceConfig,
    pool: &DescriptorPool,
) -> Result<MessageShape, GeneratorError> {
    let descriptor = ResourceDescriptor {
        type_name: cfg.resource_type_name(),
        pattern: cfg.name_pattern(),
        singular: cfg.singular(),
        plural: cfg.collection_identifier(),
    };

    let mut message = MessageShape::new(cfg.resource.clone())
        .with_comment(format!("{} resource.", cfg.resource))
        .with_options(resource(descriptor));

    message.add_field(
        FieldShape::string("name")
            .with_comment("The resource's name.")
            .with_options(identifier()),
    )?;

    if cfg.with_display_name {
        message.add_field(
            FieldShape::string("display_name")
                .with_comment("The resource's display name.")
                .with_options(optional()),
        )?;
    }

    if cfg.with_timestamps {
        let timestamp = well_known::resolve(pool, WellKnownType::Timestamp)?;

        message.add_field(
            FieldShape::message("create_time", timestamp.clone())
                .with_comment("The time at which the resource was created.")
                .with_options(output_only()),
        )?;
        message.add_field(
            FieldShape::message("update_time", timestamp)
                .with_comment("The time at which the resource was last updated.")
                .with_options(output_only()),
        )?;
    }

    if cfg.with_annotations {
        message.add_field(
            FieldShape::map("annotations", ScalarType::String, ScalarType::String)
                .with_comment("Custom annotations defined by the caller.")
                .with_options(optional()),
        )?;
    }

    tracing::debug!(
        message = %message.name,
        fields = message.fields.len(),
        "assembled resource message"
    );

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::FieldBehavior;
    use crate::ir::FieldType;

    fn book() -> ResourceConfig {
        ResourceConfig::new("Book", "library.v1", "library.example.com")
    }

    fn build_book(cfg: &ResourceConfig) -> MessageShape {
        build(cfg, &well_known::default_pool()).unwrap()
    }

    #[test]
    fn test_all_optional_fields() {
        let message = build_book(&book());

        assert_eq!(
            message.field_names(),
            vec!["name", "display_name", "create_time", "update_time", "annotations"]
        );
        assert_eq!(message.fields[0].behavior(), Some(FieldBehavior::Identifier));
        assert_eq!(message.fields[1].behavior(), Some(FieldBehavior::Optional));
        assert_eq!(message.fields[2].behavior(), Some(FieldBehavior::OutputOnly));
        assert_eq!(message.fields[3].behavior(), Some(FieldBehavior::OutputOnly));
        assert_eq!(message.fields[4].behavior(), Some(FieldBehavior::Optional));
        assert!(message.fields[4].is_map());
    }

    #[test]
    fn test_toggles_are_independent() {
        let mut cfg = book();
        cfg.with_display_name = false;
        cfg.with_annotations = false;
        assert_eq!(
            build_book(&cfg).field_names(),
            vec!["name", "create_time", "update_time"]
        );

        let mut cfg = book();
        cfg.with_timestamps = false;
        assert_eq!(
            build_book(&cfg).field_names(),
            vec!["name", "display_name", "annotations"]
        );
    }

    #[test]
    fn test_timestamps_use_well_known_type() {
        let message = build_book(&book());
        let create_time = message.field("create_time").unwrap();
        match &create_time.field_type {
            FieldType::Message(type_ref) => {
                assert_eq!(type_ref.name(), "google.protobuf.Timestamp")
            }
            other => panic!("unexpected type {other:?}"),
        }
    }

    #[test]
    fn test_resource_descriptor() {
        let mut cfg = book();
        cfg.parent_pattern = Some("publishers/{publisher}".to_string());
        let message = build_book(&cfg);

        let descriptor = message.options.resource.unwrap();
        assert_eq!(descriptor.type_name, "library.example.com/Book");
        assert_eq!(descriptor.pattern, "publishers/{publisher}/books/{book}");
        assert_eq!(descriptor.singular, "book");
        assert_eq!(descriptor.plural, "books");
    }
}
