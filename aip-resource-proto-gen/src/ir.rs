//! Intermediate Representation (IR) of the generated schema
//!
//! The IR is independent of any output format. The assemblers in
//! [`crate::builder`] produce a [`FileSchema`]; [`crate::render`] turns it into
//! `.proto` text and [`crate::descriptor`] into a `FileDescriptorProto`.

use std::collections::BTreeSet;

use crate::annotations::{
    CLIENT_IMPORT, FIELD_BEHAVIOR_IMPORT, FieldBehavior, FieldOptions, HTTP_IMPORT,
    MessageOptions, MethodOptions, RESOURCE_IMPORT, ServiceOptions,
};
use crate::config::Syntax;
use crate::error::GeneratorError;

/// Scalar field types used by generated messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Int32,
    Bool,
}

impl ScalarType {
    /// Protobuf keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Int32 => "int32",
            ScalarType::Bool => "bool",
        }
    }
}

/// Reference to a message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Message declared in the generated file
    Local(String),
    /// Well-known type imported from another file
    WellKnown {
        /// Fully qualified name (e.g., "google.protobuf.Timestamp")
        full_name: String,
        /// File declaring it (e.g., "google/protobuf/timestamp.proto")
        file: String,
    },
}

impl TypeRef {
    /// Name as written in the generated file
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Local(name) => name,
            TypeRef::WellKnown { full_name, .. } => full_name,
        }
    }

    /// Import needed to use this type, if any
    pub fn import(&self) -> Option<&str> {
        match self {
            TypeRef::Local(_) => None,
            TypeRef::WellKnown { file, .. } => Some(file),
        }
    }
}

/// Field type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarType),
    Message(TypeRef),
    Map { key: ScalarType, value: ScalarType },
}

/// A field of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    /// Field name (snake_case)
    pub name: String,

    /// Field type
    pub field_type: FieldType,

    /// `repeated` field
    pub repeated: bool,

    /// Attached options
    pub options: FieldOptions,

    /// Leading comment
    pub comment: String,
}

impl FieldShape {
    /// A singular field without options
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            repeated: false,
            options: FieldOptions::default(),
            comment: String::new(),
        }
    }

    /// A `string` field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::String))
    }

    /// An `int32` field
    pub fn int32(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::Int32))
    }

    /// A `bool` field
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Scalar(ScalarType::Bool))
    }

    /// A message typed field
    pub fn message(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self::new(name, FieldType::Message(type_ref))
    }

    /// A `map<key, value>` field
    pub fn map(name: impl Into<String>, key: ScalarType, value: ScalarType) -> Self {
        Self::new(name, FieldType::Map { key, value })
    }

    /// Mark the field as `repeated`
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Attach options
    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the leading comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Field behavior, if any
    pub fn behavior(&self) -> Option<FieldBehavior> {
        self.options.behavior
    }

    /// Whether this is a map field
    pub fn is_map(&self) -> bool {
        matches!(self.field_type, FieldType::Map { .. })
    }
}

/// A message declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageShape {
    /// Message name
    pub name: String,

    /// Leading comment
    pub comment: String,

    /// Fields in declaration order
    pub fields: Vec<FieldShape>,

    /// Message options
    pub options: MessageOptions,
}

impl MessageShape {
    /// An empty message
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            fields: Vec::new(),
            options: MessageOptions::default(),
        }
    }

    /// Set the leading comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Attach options
    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a field, rejecting duplicate names
    pub fn add_field(&mut self, field: FieldShape) -> Result<(), GeneratorError> {
        if self.field(&field.name).is_some() {
            return Err(GeneratorError::DuplicateField {
                message: self.name.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Reference to this message for use as a field or method type
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::Local(self.name.clone())
    }
}

/// An RPC method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
    /// Method name
    pub name: String,

    /// Leading comment
    pub comment: String,

    /// Request type
    pub input: TypeRef,

    /// Response type
    pub output: TypeRef,

    /// HTTP binding and method signature, when generated
    pub options: Option<MethodOptions>,
}

/// A service declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceShape {
    /// Service name
    pub name: String,

    /// Leading comment
    pub comment: String,

    /// Service options
    pub options: ServiceOptions,

    /// Methods in declaration order
    pub methods: Vec<MethodShape>,
}

impl ServiceShape {
    /// A service without methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            options: ServiceOptions::default(),
            methods: Vec::new(),
        }
    }

    /// Append a method, rejecting duplicate names
    pub fn add_method(&mut self, method: MethodShape) -> Result<(), GeneratorError> {
        if self.method(&method.name).is_some() {
            return Err(GeneratorError::DuplicateMethod { name: method.name });
        }
        self.methods.push(method);
        Ok(())
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodShape> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A complete generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSchema {
    /// File name (e.g., "book.proto")
    pub name: String,

    /// Package name
    pub package: String,

    /// Syntax version
    pub syntax: Syntax,

    /// Messages in declaration order, the resource first
    pub messages: Vec<MessageShape>,

    /// The service
    pub service: Option<ServiceShape>,
}

impl FileSchema {
    /// An empty file
    pub fn new(name: impl Into<String>, package: impl Into<String>, syntax: Syntax) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            syntax,
            messages: Vec::new(),
            service: None,
        }
    }

    /// Append a message, rejecting duplicate names
    pub fn add_message(&mut self, message: MessageShape) -> Result<(), GeneratorError> {
        if self.message(&message.name).is_some() {
            return Err(GeneratorError::DuplicateMessage { name: message.name });
        }
        self.messages.push(message);
        Ok(())
    }

    /// Look up a message by name
    pub fn message(&self, name: &str) -> Option<&MessageShape> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Message names in declaration order
    pub fn message_names(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.name.as_str()).collect()
    }

    /// Files that must be imported, sorted and without duplicates
    pub fn imports(&self) -> Vec<String> {
        let mut imports = BTreeSet::new();

        for message in &self.messages {
            if message.options.resource.is_some() {
                imports.insert(RESOURCE_IMPORT);
            }
            for field in &message.fields {
                if field.options.behavior.is_some() {
                    imports.insert(FIELD_BEHAVIOR_IMPORT);
                }
                if let FieldType::Message(type_ref) = &field.field_type {
                    imports.extend(type_ref.import());
                }
            }
        }

        if let Some(service) = &self.service {
            if service.options.default_host.is_some() {
                imports.insert(CLIENT_IMPORT);
            }
            for method in &service.methods {
                imports.extend(method.input.import());
                imports.extend(method.output.import());
                if let Some(options) = &method.options {
                    if options.http.is_some() {
                        imports.insert(HTTP_IMPORT);
                    }
                    if !options.signature.is_empty() {
                        imports.insert(CLIENT_IMPORT);
                    }
                }
            }
        }

        imports.into_iter().map(str::to_string).collect()
    }
}
