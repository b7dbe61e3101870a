//! Update method (AIP-134)

use super::{GeneratedMethod, MethodContext};
use crate::annotations::{HttpRule, HttpVerb, optional, required};
use crate::config::Method;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MethodShape};
use crate::well_known::WellKnownType;

pub(super) fn build(ctx: &MethodContext<'_>) -> Result<GeneratedMethod, GeneratorError> {
    let cfg = ctx.cfg;
    let name = ctx.method_name(Method::Update);
    let resource_field = cfg.resource_snake_case();

    let mut request = ctx.request(Method::Update);
    request.add_field(
        FieldShape::message(resource_field.clone(), ctx.resource.clone())
            .with_comment(format!(
                "The {} resource to update. Its name identifies the resource to update.",
                cfg.resource
            ))
            .with_options(required()),
    )?;

    if cfg.with_update_field_mask {
        let field_mask = ctx.well_known(WellKnownType::FieldMask)?;
        request.add_field(
            FieldShape::message("update_mask", field_mask)
                .with_comment("The list of fields to update.")
                .with_options(optional()),
        )?;
    }

    if cfg.with_update_allow_missing {
        request.add_field(
            FieldShape::bool("allow_missing")
                .with_comment(
                    "If set to true, and the resource is not found, a new resource will be created.",
                )
                .with_options(optional()),
        )?;
    }

    let mut signature = vec![resource_field.clone()];
    if cfg.with_update_field_mask {
        signature.push("update_mask".to_string());
    }

    let rule = HttpRule::new(
        HttpVerb::Patch,
        format!("/v1/{{{resource_field}.name={}}}", cfg.name_url_ref()),
    )
    .with_body(resource_field);

    let method = MethodShape {
        comment: format!("Update the {} resource", cfg.resource),
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
