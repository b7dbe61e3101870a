//! aip-resource-proto-gen
//!
//! Scaffolds a protobuf schema for a single resource following Google's API
//! Improvement Proposals: the resource message plus a service with the
//! standard Get, List, Create, Update and Delete methods, annotated with field
//! behaviors, a resource descriptor, HTTP bindings and method signatures.
//!
//! ```no_run
//! use aip_resource_proto_gen::{ResourceConfig, generate};
//!
//! let mut cfg = ResourceConfig::new("Book", "library.v1", "library.example.com");
//! cfg.parent_pattern = Some("publishers/{publisher}".to_string());
//! print!("{}", generate(&cfg)?);
//! # Ok::<(), aip_resource_proto_gen::GeneratorError>(())
//! ```

pub mod annotations;
pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ir;
pub mod names;
pub mod render;
pub mod well_known;

pub use builder::{SchemaBuilder, build_schema};
pub use config::{Method, MethodSet, ResourceConfig, Syntax};
pub use error::{ConfigError, GeneratorError};
pub use ir::FileSchema;
pub use render::{RenderOptions, render};

/// Assemble the schema for a configuration and render it as `.proto` text
pub fn generate(cfg: &ResourceConfig) -> Result<String, GeneratorError> {
    let schema = build_schema(cfg)?;
    Ok(render(
        &schema,
        RenderOptions {
            compact: cfg.compact,
        },
    ))
}
