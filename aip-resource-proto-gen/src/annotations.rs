//! AIP annotations
//!
//! Small value-producing decorators that attach `google.api` metadata to
//! fields, messages, methods and services. Each returns an immutable record;
//! the renderer and the descriptor lowering decide how to spell it.

use std::fmt;

/// `(google.api.field_behavior)`
pub const FIELD_BEHAVIOR_EXTENSION_NAME: &str = "google.api.field_behavior";
/// `(google.api.resource)`
pub const RESOURCE_EXTENSION_NAME: &str = "google.api.resource";
/// `(google.api.http)`
pub const HTTP_EXTENSION_NAME: &str = "google.api.http";
/// `(google.api.method_signature)`
pub const METHOD_SIGNATURE_EXTENSION_NAME: &str = "google.api.method_signature";
/// `(google.api.default_host)`
pub const DEFAULT_HOST_EXTENSION_NAME: &str = "google.api.default_host";

/// Import declaring `google.api.field_behavior`
pub const FIELD_BEHAVIOR_IMPORT: &str = "google/api/field_behavior.proto";
/// Import declaring `google.api.resource`
pub const RESOURCE_IMPORT: &str = "google/api/resource.proto";
/// Import declaring `google.api.http`
pub const HTTP_IMPORT: &str = "google/api/annotations.proto";
/// Import declaring `google.api.method_signature` and `google.api.default_host`
pub const CLIENT_IMPORT: &str = "google/api/client.proto";

/// Field behavior (AIP-203)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldBehavior {
    /// Must be provided by the caller
    Required,
    /// May be provided by the caller
    Optional,
    /// Set by the server only
    OutputOnly,
    /// The resource name field
    Identifier,
}

impl FieldBehavior {
    /// Enum value name in `google.api.FieldBehavior`
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldBehavior::Required => "REQUIRED",
            FieldBehavior::Optional => "OPTIONAL",
            FieldBehavior::OutputOnly => "OUTPUT_ONLY",
            FieldBehavior::Identifier => "IDENTIFIER",
        }
    }
}

impl fmt::Display for FieldBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource descriptor (AIP-123)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Resource type, `<service>/<Resource>`
    pub type_name: String,
    /// Canonical name pattern
    pub pattern: String,
    /// lowerCamelCase singular
    pub singular: String,
    /// lowerCamelCase plural
    pub plural: String,
}

impl ResourceDescriptor {
    /// Aggregate fields in declaration order
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("type", self.type_name.as_str()),
            ("pattern", self.pattern.as_str()),
            ("singular", self.singular.as_str()),
            ("plural", self.plural.as_str()),
        ]
    }

    /// Text format body, e.g. `type: "x/Book" pattern: "books/{book}" ...`
    pub fn aggregate(&self) -> String {
        aggregate(self.fields())
    }
}

/// HTTP verb of a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpVerb {
    /// Field name in `google.api.HttpRule`
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
        }
    }
}

/// HTTP binding (AIP-127)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRule {
    /// Verb
    pub verb: HttpVerb,
    /// URL template, e.g. `/v1/{name=books/*}`
    pub path: String,
    /// Request field mapped to the HTTP body
    pub body: Option<String>,
}

impl HttpRule {
    /// Binding without a body
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: None,
        }
    }

    /// Map the given request field to the HTTP body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Aggregate fields in declaration order
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![(self.verb.as_str(), self.path.as_str())];
        if let Some(body) = &self.body {
            fields.push(("body", body.as_str()));
        }
        fields
    }

    /// Text format body, e.g. `get: "/v1/{name=books/*}"`
    pub fn aggregate(&self) -> String {
        aggregate(self.fields())
    }
}

/// Options attached to a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Field behavior, at most one per field
    pub behavior: Option<FieldBehavior>,
}

/// Options attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    /// Resource descriptor
    pub resource: Option<ResourceDescriptor>,
}

/// Options attached to a method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodOptions {
    /// HTTP binding
    pub http: Option<HttpRule>,
    /// Method signature fields, in order
    pub signature: Vec<String>,
}

impl MethodOptions {
    /// Comma separated signature, as it appears in the schema
    pub fn signature_value(&self) -> Option<String> {
        if self.signature.is_empty() {
            None
        } else {
            Some(self.signature.join(","))
        }
    }
}

/// Options attached to a service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Default host
    pub default_host: Option<String>,
}

/// A single method-level annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodAnnotation {
    /// `(google.api.http)`
    Http(HttpRule),
    /// `(google.api.method_signature)`
    Signature(Vec<String>),
}

fn field_behavior(behavior: FieldBehavior) -> FieldOptions {
    FieldOptions {
        behavior: Some(behavior),
    }
}

/// REQUIRED field behavior
pub fn required() -> FieldOptions {
    field_behavior(FieldBehavior::Required)
}

/// OPTIONAL field behavior
pub fn optional() -> FieldOptions {
    field_behavior(FieldBehavior::Optional)
}

/// OUTPUT_ONLY field behavior
pub fn output_only() -> FieldOptions {
    field_behavior(FieldBehavior::OutputOnly)
}

/// IDENTIFIER field behavior
pub fn identifier() -> FieldOptions {
    field_behavior(FieldBehavior::Identifier)
}

/// Resource descriptor message option
pub fn resource(descriptor: ResourceDescriptor) -> MessageOptions {
    MessageOptions {
        resource: Some(descriptor),
    }
}

/// HTTP binding method annotation
pub fn http_rule(rule: HttpRule) -> MethodAnnotation {
    MethodAnnotation::Http(rule)
}

/// Method signature annotation; empty entries are dropped
pub fn method_signature<I, S>(fields: I) -> MethodAnnotation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    MethodAnnotation::Signature(
        fields
            .into_iter()
            .map(Into::into)
            .filter(|f: &String| !f.is_empty())
            .collect(),
    )
}

/// Default host service option
pub fn default_host(host: impl Into<String>) -> ServiceOptions {
    ServiceOptions {
        default_host: Some(host.into()),
    }
}

/// Combine method annotations into one set of options
///
/// Returns `None` when nothing was applied.
pub fn method_options<I>(annotations: I) -> Option<MethodOptions>
where
    I: IntoIterator<Item = MethodAnnotation>,
{
    let mut options = MethodOptions::default();
    let mut applied = false;

    for annotation in annotations {
        match annotation {
            MethodAnnotation::Http(rule) => options.http = Some(rule),
            MethodAnnotation::Signature(fields) => options.signature.extend(fields),
        }
        applied = true;
    }

    applied.then_some(options)
}

/// Quote a string for protobuf text
pub(crate) fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn aggregate<'a>(fields: impl IntoIterator<Item = (&'static str, &'a str)>) -> String {
    fields
        .into_iter()
        .map(|(key, value)| format!("{key}: {}", quoted(value)))
        .collect::<Vec<_>>()
        .join(" ")
}
