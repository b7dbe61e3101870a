//! aip-resource-proto-gen: scaffold a protobuf schema for an AIP resource
//!
//! Usage:
//!   aip-resource-proto-gen Book --package library.v1 --service library.example.com \
//!       --resource-parent 'publishers/{publisher}' > book.proto

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use aip_resource_proto_gen::descriptor::encode_file_descriptor_set;
use aip_resource_proto_gen::{
    GeneratorError, MethodSet, RenderOptions, ResourceConfig, Syntax, build_schema, render,
};
use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "aip-resource-proto-gen")]
#[command(about = "Scaffold protobuf IDL file for AIP resource")]
struct Args {
    /// Singular resource name (e.g., Book)
    resource: String,

    /// Plural form of the resource name
    #[arg(long)]
    resource_plural: Option<String>,

    /// Pattern of the parent resource, if any (e.g., publishers/{publisher})
    #[arg(long)]
    resource_parent: Option<String>,

    /// Whether the resource id is required in the Create method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    resource_id_required: bool,

    /// Whether to generate the display_name field for the resource
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    resource_with_display_name: bool,

    /// Whether to generate the create_time and update_time fields for the resource
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    resource_with_timestamps: bool,

    /// Whether to generate the annotations field for the resource
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    resource_with_annotations: bool,

    /// Package name for the generated protobuf file
    #[arg(long)]
    package: String,

    /// Service name, used for the resource type and the default host
    #[arg(long)]
    service: String,

    /// Syntax for the generated protobuf file (proto2 or proto3)
    #[arg(long, default_value = "proto3")]
    syntax: Syntax,

    /// Methods to generate: any of c(reate), r(ead), u(pdate), d(elete), l(ist)
    #[arg(long, default_value = "crudl")]
    methods: MethodSet,

    /// Generate HTTP bindings and method signatures
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_http_options: bool,

    /// Generate the order_by field for the List method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_list_order_by: bool,

    /// Generate the filter field for the List method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_list_filter: bool,

    /// Generate the update_mask field for the Update method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_update_field_mask: bool,

    /// Generate the allow_missing field for the Update method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_update_allow_missing: bool,

    /// Generate the allow_missing field for the Delete method
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = true, default_missing_value = "true")]
    with_delete_allow_missing: bool,

    /// Generate a compact proto file
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_value_t = false, default_missing_value = "true")]
    compact: bool,

    /// Write the schema to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write an encoded FileDescriptorSet to this file
    #[arg(long)]
    descriptor_set_out: Option<PathBuf>,
}

impl From<&Args> for ResourceConfig {
    fn from(args: &Args) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        ResourceConfig {
            resource: args.resource.clone(),
            plural: non_empty(&args.resource_plural),
            package: args.package.clone(),
            service: args.service.clone(),
            syntax: args.syntax,
            methods: args.methods,
            parent_pattern: non_empty(&args.resource_parent),
            id_required: args.resource_id_required,
            with_display_name: args.resource_with_display_name,
            with_timestamps: args.resource_with_timestamps,
            with_annotations: args.resource_with_annotations,
            with_list_filter: args.with_list_filter,
            with_list_order_by: args.with_list_order_by,
            with_update_field_mask: args.with_update_field_mask,
            with_update_allow_missing: args.with_update_allow_missing,
            with_delete_allow_missing: args.with_delete_allow_missing,
            with_http_options: args.with_http_options,
            compact: args.compact,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries the schema
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "generation failed");
            eprintln!("error: failed to generate {}: {}", args.resource, err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<(), GeneratorError> {
    let cfg = ResourceConfig::from(args);
    let schema = build_schema(&cfg)?;

    let text = render(
        &schema,
        RenderOptions {
            compact: cfg.compact,
        },
    );

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            tracing::info!("Generated {}", path.display());
        }
        None => std::io::stdout().write_all(text.as_bytes())?,
    }

    if let Some(path) = &args.descriptor_set_out {
        std::fs::write(path, encode_file_descriptor_set(&schema))?;
        tracing::info!("Wrote descriptor set to {}", path.display());
    }

    Ok(())
}
