//! Delete method (AIP-135)

use super::{GeneratedMethod, MethodContext};
use crate::annotations::{HttpRule, HttpVerb, optional, required};
use crate::config::Method;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MethodShape};
use crate::well_known::WellKnownType;

pub(super) fn build(ctx: &MethodContext<'_>) -> Result<GeneratedMethod, GeneratorError> {
    let cfg = ctx.cfg;
    let name = ctx.method_name(Method::Delete);

    let mut request = ctx.request(Method::Delete);
    request.add_field(
        FieldShape::string("name")
            .with_comment("The name of the resource to delete.")
            .with_options(required()),
    )?;

    if cfg.with_delete_allow_missing {
        request.add_field(
            FieldShape::bool("allow_missing")
                .with_comment(
                    "If set to true, and the resource is not found, no errors will be returned.",
                )
                .with_options(optional()),
        )?;
    }

    let empty = ctx.well_known(WellKnownType::Empty)?;
    let rule = HttpRule::new(
        HttpVerb::Delete,
        format!("/v1/{{name={}}}", cfg.name_url_ref()),
    );

    let method = MethodShape {
        comment: format!("Delete the {} resource", cfg.resource),
        input: request.type_ref(),
        output: empty,
        options: ctx.http_options(rule, vec!["name".to_string()]),
        name,
    };

    Ok(GeneratedMethod {
        messages: vec![request],
        method,
    })
}
