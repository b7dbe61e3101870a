//! Schema assembly
//!
//! [`SchemaBuilder`] drives the whole generation: it validates the
//! configuration, builds the resource message, creates the service and then
//! runs the enabled method assemblers in a fixed order (Get, List, Create,
//! Update, Delete). Each method assembler is a pure function of a
//! [`MethodContext`] returning the messages and the method it produced.

mod create;
mod delete;
mod get;
mod list;
mod resource;
mod update;

use prost_reflect::DescriptorPool;

use crate::annotations::{
    HttpRule, MethodOptions, default_host, http_rule, method_options, method_signature, required,
};
use crate::config::{Method, ResourceConfig};
use crate::error::GeneratorError;
use crate::ir::{FieldShape, FileSchema, MessageShape, MethodShape, ServiceShape, TypeRef};
use crate::well_known::{self, WellKnownType};

/// Everything a method assembler needs
pub(crate) struct MethodContext<'a> {
    /// The configuration being generated
    pub cfg: &'a ResourceConfig,
    /// Reference to the resource message
    pub resource: &'a TypeRef,
    /// Pool used to resolve well-known types
    pub pool: &'a DescriptorPool,
}

impl MethodContext<'_> {
    /// Method name, e.g. "GetBook"
    pub fn method_name(&self, method: Method) -> String {
        format!("{}{}", method.verb(), self.cfg.resource)
    }

    /// Empty request message, e.g. "GetBookRequest"
    pub fn request(&self, method: Method) -> MessageShape {
        let name = self.method_name(method);
        MessageShape::new(format!("{name}Request"))
            .with_comment(format!("Request for {name} method."))
    }

    /// Required `parent` field, used by collection methods
    pub fn parent_field(&self) -> FieldShape {
        FieldShape::string("parent")
            .with_comment("The resource's parent.")
            .with_options(required())
    }

    /// `/v1/{parent=...}/<collection>`, or `/v1/<collection>` without a parent
    pub fn collection_path(&self) -> String {
        match self.cfg.parent_url_ref() {
            Some(parent) => format!(
                "/v1/{{parent={parent}}}/{}",
                self.cfg.collection_identifier()
            ),
            None => format!("/v1/{}", self.cfg.collection_identifier()),
        }
    }

    /// HTTP binding and signature, or nothing when HTTP options are disabled
    pub fn http_options(&self, rule: HttpRule, signature: Vec<String>) -> Option<MethodOptions> {
        if !self.cfg.with_http_options {
            return None;
        }
        method_options([http_rule(rule), method_signature(signature)])
    }

    /// Resolve a well-known type
    pub fn well_known(&self, wkt: WellKnownType) -> Result<TypeRef, GeneratorError> {
        well_known::resolve(self.pool, wkt)
    }
}

/// Output of one method assembler
pub(crate) struct GeneratedMethod {
    /// Request (and response) messages, in declaration order
    pub messages: Vec<MessageShape>,
    /// The method bound to them
    pub method: MethodShape,
}

/// Builds a [`FileSchema`] from a [`ResourceConfig`]
pub struct SchemaBuilder<'a> {
    cfg: &'a ResourceConfig,
    pool: DescriptorPool,
}

impl<'a> SchemaBuilder<'a> {
    /// Builder resolving well-known types from the global descriptor pool
    pub fn new(cfg: &'a ResourceConfig) -> Self {
        Self {
            cfg,
            pool: well_known::default_pool(),
        }
    }

    /// Resolve well-known types from another pool
    pub fn with_pool(mut self, pool: DescriptorPool) -> Self {
        self.pool = pool;
        self
    }

    /// Validate the configuration and assemble the schema
    pub fn build(self) -> Result<FileSchema, GeneratorError> {
        let cfg = self.cfg;
        cfg.validate()?;

        tracing::debug!(
            resource = %cfg.resource,
            package = %cfg.package,
            methods = %cfg.methods,
            "assembling schema"
        );

        let mut file = FileSchema::new(cfg.file_name(), cfg.package.clone(), cfg.syntax);

        let resource = resource::build(cfg, &self.pool)?;
        let resource_ref = resource.type_ref();
        file.add_message(resource)?;

        let mut service = ServiceShape::new(cfg.service_name());
        service.comment = format!("Service for managing the {} resource.", cfg.resource);
        service.options = default_host(cfg.service.clone());

        let ctx = MethodContext {
            cfg,
            resource: &resource_ref,
            pool: &self.pool,
        };

        for method in cfg.methods.iter() {
            add_method(&ctx, method, &mut file, &mut service)
                .map_err(|e| e.in_method(&cfg.resource, method))?;
        }

        file.service = Some(service);
        Ok(file)
    }
}

fn add_method(
    ctx: &MethodContext<'_>,
    method: Method,
    file: &mut FileSchema,
    service: &mut ServiceShape,
) -> Result<(), GeneratorError> {
    let generated = match method {
        Method::Get => get::build(ctx)?,
        Method::List => list::build(ctx)?,
        Method::Create => create::build(ctx)?,
        Method::Update => update::build(ctx)?,
        Method::Delete => delete::build(ctx)?,
    };

    tracing::debug!(
        method = %generated.method.name,
        messages = generated.messages.len(),
        http = generated.method.options.is_some(),
        "assembled method"
    );

    for message in generated.messages {
        file.add_message(message)?;
    }
    service.add_method(generated.method)
}

/// Assemble the schema for a configuration
pub fn build_schema(cfg: &ResourceConfig) -> Result<FileSchema, GeneratorError> {
    SchemaBuilder::new(cfg).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::FieldBehavior;
    use crate::config::MethodSet;
    use crate::error::ConfigError;

    fn library() -> ResourceConfig {
        let mut cfg = ResourceConfig::new("Book", "library.v1", "library.example.com");
        cfg.parent_pattern = Some("publishers/{publisher}".to_string());
        cfg
    }

    #[test]
    fn test_message_and_method_order() {
        let file = build_schema(&library()).unwrap();

        assert_eq!(
            file.message_names(),
            vec![
                "Book",
                "GetBookRequest",
                "ListBookRequest",
                "ListBookResponse",
                "CreateBookRequest",
                "UpdateBookRequest",
                "DeleteBookRequest",
            ]
        );

        let service = file.service.as_ref().unwrap();
        assert_eq!(service.name, "BookService");
        assert_eq!(
            service.options.default_host.as_deref(),
            Some("library.example.com")
        );
        let methods: Vec<_> = service.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            methods,
            vec!["GetBook", "ListBook", "CreateBook", "UpdateBook", "DeleteBook"]
        );
    }

    #[test]
    fn test_absent_methods_are_not_generated() {
        let mut cfg = library();
        cfg.methods = "rd".parse::<MethodSet>().unwrap();
        let file = build_schema(&cfg).unwrap();

        assert_eq!(
            file.message_names(),
            vec!["Book", "GetBookRequest", "DeleteBookRequest"]
        );
        let service = file.service.unwrap();
        assert!(service.method("ListBook").is_none());
        assert!(service.method("CreateBook").is_none());
        assert!(service.method("UpdateBook").is_none());
    }

    #[test]
    fn test_invalid_config_fails_before_assembly() {
        let mut cfg = library();
        cfg.package.clear();
        let err = build_schema(&cfg).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Config(ConfigError::MissingPackage)
        ));
    }

    #[test]
    fn test_duplicate_field_reports_method() {
        // The Update request would declare `update_mask` twice
        let cfg = ResourceConfig::new("UpdateMask", "masks.v1", "masks.example.com");
        let err = build_schema(&cfg).unwrap_err();

        match err {
            GeneratorError::Method {
                resource,
                method,
                source,
            } => {
                assert_eq!(resource, "UpdateMask");
                assert_eq!(method, Method::Update);
                assert!(matches!(*source, GeneratorError::DuplicateField { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_well_known_type_is_recoverable() {
        let mut cfg = library();
        cfg.with_timestamps = false;
        cfg.methods = "u".parse().unwrap();

        let err = SchemaBuilder::new(&cfg)
            .with_pool(DescriptorPool::new())
            .build()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Book: failed to build Update method: well-known type google.protobuf.FieldMask is not available"
        );
    }

    #[test]
    fn test_without_http_options() {
        let mut cfg = library();
        cfg.with_http_options = false;
        let file = build_schema(&cfg).unwrap();

        let service = file.service.unwrap();
        assert!(service.methods.iter().all(|m| m.options.is_none()));
        // The default host does not depend on HTTP options
        assert!(service.options.default_host.is_some());
    }

    #[test]
    fn test_idempotent() {
        let cfg = library();
        assert_eq!(build_schema(&cfg).unwrap(), build_schema(&cfg).unwrap());
    }

    #[test]
    fn test_resource_name_field_is_identifier() {
        let mut cfg = library();
        cfg.with_display_name = false;
        cfg.with_timestamps = false;
        cfg.with_annotations = false;
        let file = build_schema(&cfg).unwrap();

        let book = file.message("Book").unwrap();
        assert_eq!(book.field_names(), vec!["name"]);
        assert_eq!(book.fields[0].behavior(), Some(FieldBehavior::Identifier));
    }
}
