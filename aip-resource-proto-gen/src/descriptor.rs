//! Lowering to protobuf descriptors
//!
//! Converts a [`FileSchema`] into a `google.protobuf.FileDescriptorProto` so the
//! generated schema can be fed to descriptor based tooling. AIP annotations are
//! carried as uninterpreted options, the same form protoc produces when the
//! `google.api` extensions are not linked in.

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::uninterpreted_option::NamePart;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FieldOptions, FileDescriptorProto, FileDescriptorSet,
    MessageOptions, MethodDescriptorProto, MethodOptions, ServiceDescriptorProto, ServiceOptions,
    UninterpretedOption,
};

use crate::annotations::{
    DEFAULT_HOST_EXTENSION_NAME, FIELD_BEHAVIOR_EXTENSION_NAME, HTTP_EXTENSION_NAME,
    METHOD_SIGNATURE_EXTENSION_NAME, RESOURCE_EXTENSION_NAME,
};
use crate::ir::{
    FieldShape, FieldType, FileSchema, MessageShape, MethodShape, ScalarType, ServiceShape,
    TypeRef,
};

/// Lower a schema to a `FileDescriptorProto`
pub fn to_file_descriptor(file: &FileSchema) -> FileDescriptorProto {
    let message_type = file
        .messages
        .iter()
        .map(|message| lower_message(file, message))
        .collect();

    let service = file
        .service
        .iter()
        .map(|service| lower_service(file, service))
        .collect();

    FileDescriptorProto {
        name: Some(file.name.clone()),
        package: Some(file.package.clone()),
        dependency: file.imports(),
        message_type,
        service,
        syntax: Some(file.syntax.as_str().to_string()),
        ..Default::default()
    }
}

/// Lower a schema to a `FileDescriptorSet` holding just the generated file
pub fn to_file_descriptor_set(file: &FileSchema) -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![to_file_descriptor(file)],
    }
}

/// Encoded `FileDescriptorSet`, as written by `--descriptor-set-out`
pub fn encode_file_descriptor_set(file: &FileSchema) -> Vec<u8> {
    to_file_descriptor_set(file).encode_to_vec()
}

fn lower_message(file: &FileSchema, message: &MessageShape) -> DescriptorProto {
    let mut nested_type = Vec::new();
    let mut field = Vec::with_capacity(message.fields.len());

    for (index, shape) in message.fields.iter().enumerate() {
        let number = index as i32 + 1;
        if let FieldType::Map { key, value } = &shape.field_type {
            let entry = map_entry(&shape.name, *key, *value);
            let type_name = format!(
                "{}.{}",
                qualified_name(file, &message.name),
                entry.name.as_deref().unwrap_or_default()
            );
            nested_type.push(entry);
            field.push(FieldDescriptorProto {
                label: Some(Label::Repeated as i32),
                r#type: Some(Type::Message as i32),
                type_name: Some(type_name),
                ..base_field(shape, number)
            });
        } else {
            field.push(lower_field(file, shape, number));
        }
    }

    let options = message.options.resource.as_ref().map(|resource| MessageOptions {
        uninterpreted_option: vec![aggregate_option(
            RESOURCE_EXTENSION_NAME,
            resource.aggregate(),
        )],
        ..Default::default()
    });

    DescriptorProto {
        name: Some(message.name.clone()),
        field,
        nested_type,
        options,
        ..Default::default()
    }
}

fn base_field(shape: &FieldShape, number: i32) -> FieldDescriptorProto {
    let options = shape.behavior().map(|behavior| FieldOptions {
        uninterpreted_option: vec![UninterpretedOption {
            name: extension_name(FIELD_BEHAVIOR_EXTENSION_NAME),
            identifier_value: Some(behavior.as_str().to_string()),
            ..Default::default()
        }],
        ..Default::default()
    });

    FieldDescriptorProto {
        name: Some(shape.name.clone()),
        number: Some(number),
        json_name: Some(shape.name.to_lower_camel_case()),
        options,
        ..Default::default()
    }
}

fn lower_field(file: &FileSchema, shape: &FieldShape, number: i32) -> FieldDescriptorProto {
    let label = if shape.repeated {
        Label::Repeated
    } else {
        Label::Optional
    };

    let (r#type, type_name) = match &shape.field_type {
        FieldType::Scalar(scalar) => (scalar_type(*scalar), None),
        FieldType::Message(type_ref) => (Type::Message, Some(type_name(file, type_ref))),
        // Handled by lower_message
        FieldType::Map { .. } => (Type::Message, None),
    };

    FieldDescriptorProto {
        label: Some(label as i32),
        r#type: Some(r#type as i32),
        type_name,
        ..base_field(shape, number)
    }
}

/// Synthetic `<Field>Entry` message backing a map field
fn map_entry(field_name: &str, key: ScalarType, value: ScalarType) -> DescriptorProto {
    let entry_field = |name: &str, number: i32, scalar: ScalarType| FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(scalar_type(scalar) as i32),
        json_name: Some(name.to_string()),
        ..Default::default()
    };

    DescriptorProto {
        name: Some(format!("{}Entry", field_name.to_upper_camel_case())),
        field: vec![entry_field("key", 1, key), entry_field("value", 2, value)],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn lower_service(file: &FileSchema, service: &ServiceShape) -> ServiceDescriptorProto {
    let options = service.options.default_host.as_ref().map(|host| ServiceOptions {
        uninterpreted_option: vec![string_option(DEFAULT_HOST_EXTENSION_NAME, host)],
        ..Default::default()
    });

    ServiceDescriptorProto {
        name: Some(service.name.clone()),
        method: service
            .methods
            .iter()
            .map(|method| lower_method(file, method))
            .collect(),
        options,
        ..Default::default()
    }
}

fn lower_method(file: &FileSchema, method: &MethodShape) -> MethodDescriptorProto {
    let options = method.options.as_ref().map(|options| {
        let mut uninterpreted_option = Vec::new();
        if let Some(http) = &options.http {
            uninterpreted_option.push(aggregate_option(HTTP_EXTENSION_NAME, http.aggregate()));
        }
        if let Some(signature) = options.signature_value() {
            uninterpreted_option.push(string_option(METHOD_SIGNATURE_EXTENSION_NAME, &signature));
        }
        MethodOptions {
            uninterpreted_option,
            ..Default::default()
        }
    });

    MethodDescriptorProto {
        name: Some(method.name.clone()),
        input_type: Some(type_name(file, &method.input)),
        output_type: Some(type_name(file, &method.output)),
        options,
        ..Default::default()
    }
}

fn scalar_type(scalar: ScalarType) -> Type {
    match scalar {
        ScalarType::String => Type::String,
        ScalarType::Int32 => Type::Int32,
        ScalarType::Bool => Type::Bool,
    }
}

/// Fully qualified type name with the leading dot
fn type_name(file: &FileSchema, type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Local(name) => qualified_name(file, name),
        TypeRef::WellKnown { full_name, .. } => format!(".{full_name}"),
    }
}

fn qualified_name(file: &FileSchema, name: &str) -> String {
    if file.package.is_empty() {
        format!(".{name}")
    } else {
        format!(".{}.{name}", file.package)
    }
}

fn extension_name(extension: &str) -> Vec<NamePart> {
    vec![NamePart {
        name_part: extension.to_string(),
        is_extension: true,
    }]
}

fn aggregate_option(extension: &str, aggregate: String) -> UninterpretedOption {
    UninterpretedOption {
        name: extension_name(extension),
        aggregate_value: Some(aggregate),
        ..Default::default()
    }
}

fn string_option(extension: &str, value: &str) -> UninterpretedOption {
    UninterpretedOption {
        name: extension_name(extension),
        string_value: Some(value.as_bytes().to_vec()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_schema;
    use crate::config::{ResourceConfig, Syntax};

    fn library() -> FileDescriptorProto {
        let mut cfg = ResourceConfig::new("Book", "library.v1", "library.example.com");
        cfg.parent_pattern = Some("publishers/{publisher}".to_string());
        to_file_descriptor(&build_schema(&cfg).unwrap())
    }

    fn find_message<'a>(file: &'a FileDescriptorProto, name: &str) -> &'a DescriptorProto {
        file.message_type
            .iter()
            .find(|m| m.name.as_deref() == Some(name))
            .unwrap()
    }

    /// First uninterpreted option for an extension
    fn option<'a>(options: &'a [UninterpretedOption], name: &str) -> &'a UninterpretedOption {
        options
            .iter()
            .find(|o| o.name.first().is_some_and(|p| p.is_extension && p.name_part == name))
            .unwrap()
    }

    #[test]
    fn test_file_header() {
        let file = library();
        assert_eq!(file.name.as_deref(), Some("book.proto"));
        assert_eq!(file.package.as_deref(), Some("library.v1"));
        assert_eq!(file.syntax.as_deref(), Some(Syntax::Proto3.as_str()));
        assert!(file
            .dependency
            .contains(&"google/protobuf/timestamp.proto".to_string()));
        assert!(file
            .dependency
            .contains(&"google/protobuf/empty.proto".to_string()));
        assert_eq!(file.message_type.len(), 7);
    }

    #[test]
    fn test_resource_fields_and_options() {
        let file = library();
        let book = find_message(&file, "Book");

        let numbers: Vec<_> = book.field.iter().map(|f| f.number.unwrap()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        let name = &book.field[0];
        let behavior = option(
            &name.options.as_ref().unwrap().uninterpreted_option,
            FIELD_BEHAVIOR_EXTENSION_NAME,
        );
        assert_eq!(behavior.identifier_value.as_deref(), Some("IDENTIFIER"));

        let create_time = &book.field[2];
        assert_eq!(create_time.r#type, Some(Type::Message as i32));
        assert_eq!(
            create_time.type_name.as_deref(),
            Some(".google.protobuf.Timestamp")
        );

        let resource = option(
            &book.options.as_ref().unwrap().uninterpreted_option,
            RESOURCE_EXTENSION_NAME,
        );
        assert!(resource
            .aggregate_value
            .as_deref()
            .unwrap()
            .contains(r#"type: "library.example.com/Book""#));
    }

    #[test]
    fn test_map_field_uses_entry_message() {
        let file = library();
        let book = find_message(&file, "Book");

        let annotations = &book.field[4];
        assert_eq!(annotations.label, Some(Label::Repeated as i32));
        assert_eq!(
            annotations.type_name.as_deref(),
            Some(".library.v1.Book.AnnotationsEntry")
        );

        let entry = &book.nested_type[0];
        assert_eq!(entry.name.as_deref(), Some("AnnotationsEntry"));
        assert_eq!(entry.options.as_ref().unwrap().map_entry, Some(true));
        assert_eq!(entry.field.len(), 2);
    }

    #[test]
    fn test_methods() {
        let file = library();
        let service = &file.service[0];
        assert_eq!(service.name.as_deref(), Some("BookService"));

        let host = option(
            &service.options.as_ref().unwrap().uninterpreted_option,
            DEFAULT_HOST_EXTENSION_NAME,
        );
        assert_eq!(host.string_value.as_deref(), Some(&b"library.example.com"[..]));

        let delete = service
            .method
            .iter()
            .find(|m| m.name.as_deref() == Some("DeleteBook"))
            .unwrap();
        assert_eq!(delete.input_type.as_deref(), Some(".library.v1.DeleteBookRequest"));
        assert_eq!(delete.output_type.as_deref(), Some(".google.protobuf.Empty"));

        let options = &delete.options.as_ref().unwrap().uninterpreted_option;
        assert_eq!(
            option(options, HTTP_EXTENSION_NAME).aggregate_value.as_deref(),
            Some(r#"delete: "/v1/{name=publishers/*/books/*}""#)
        );
        assert_eq!(
            option(options, METHOD_SIGNATURE_EXTENSION_NAME)
                .string_value
                .as_deref(),
            Some(&b"name"[..])
        );
    }

    #[test]
    fn test_encoded_set_decodes() {
        let cfg = ResourceConfig::new("Book", "library.v1", "library.example.com");
        let schema = build_schema(&cfg).unwrap();
        let bytes = encode_file_descriptor_set(&schema);

        let decoded = FileDescriptorSet::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, to_file_descriptor_set(&schema));
    }
}
