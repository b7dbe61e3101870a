//! Create method (AIP-133)

use super::{GeneratedMethod, MethodContext};
use crate::annotations::{HttpRule, HttpVerb, required};
use crate::config::Method;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MethodShape};

pub(super) fn build(ctx: &MethodContext<'_>) -> Result<GeneratedMethod, GeneratorError> {
    let cfg = ctx.cfg;
    let name = ctx.method_name(Method::Create);
    let resource_field = cfg.resource_snake_case();
    let id_field = format!("{resource_field}_id");

    let mut request = ctx.request(Method::Create);

    if cfg.has_parent() {
        request.add_field(ctx.parent_field())?;
    }

    let mut id = FieldShape::string(id_field.clone()).with_comment(
        "The ID to use for the resource. It will become the final component of the name.",
    );
    if cfg.id_required {
        id = id.with_options(required());
    }
    request.add_field(id)?;

    request.add_field(
        FieldShape::message(resource_field.clone(), ctx.resource.clone())
            .with_comment(format!("The {} resource to create.", cfg.resource))
            .with_options(required()),
    )?;

    // parent, resource, id
    let mut signature = Vec::with_capacity(3);
    if cfg.has_parent() {
        signature.push("parent".to_string());
    }
    signature.push(resource_field.clone());
    if cfg.id_required {
        signature.push(id_field);
    }

    let rule = HttpRule::new(HttpVerb::Post, ctx.collection_path()).with_body(resource_field);

    let method = MethodShape {
        comment: format!("Create a new {} resource", cfg.resource),
        input: request.type_ref(),
        output: ctx.resource.clone(),
        options: ctx.http_options(rule, signature),
        name,
    };

    Ok(GeneratedMethod {
        messages: vec![request],
        method,
    })
}
