//! List method (AIP-132)

use super::{GeneratedMethod, MethodContext};
use crate::annotations::{HttpRule, HttpVerb, optional};
use crate::config::Method;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MessageShape, MethodShape};

pub(super) fn build(ctx: &MethodContext<'_>) -> Result<GeneratedMethod, GeneratorError> {
    let cfg = ctx.cfg;
    let name = ctx.method_name(Method::List);

    let mut request = ctx.request(Method::List);

    if cfg.has_parent() {
        request.add_field(ctx.parent_field())?;
    }

    request.add_field(
        FieldShape::int32("page_size")
            .with_comment("The maximum number of resources to return.")
            .with_options(optional()),
    )?;
    request.add_field(
        FieldShape::string("page_token")
            .with_comment(
                "The page token to use for pagination. Provide this to retrieve subsequent pages.",
            )
            .with_options(optional()),
    )?;

    if cfg.with_list_filter {
        request.add_field(
            FieldShape::string("filter")
                .with_comment("The filter to apply to list results.")
                .with_options(optional()),
        )?;
    }

    if cfg.with_list_order_by {
        request.add_field(
            FieldShape::string("order_by")
                .with_comment("The order to list results by.")
                .with_options(optional()),
        )?;
    }

    let mut response = MessageShape::new(format!("{name}Response"))
        .with_comment(format!("Response for {name} method."));
    response.add_field(
        FieldShape::message(cfg.plural_resource_snake_case(), ctx.resource.clone())
            .repeated()
            .with_comment(format!("The list of {} resources.", cfg.resource)),
    )?;
    response.add_field(FieldShape::string("next_page_token").with_comment(
        "The token to retrieve the next page of results, or empty if there are no more results.",
    ))?;

    let signature = if cfg.has_parent() {
        vec!["parent".to_string()]
    } else {
        Vec::new()
    };
    let rule = HttpRule::new(HttpVerb::Get, ctx.collection_path());

    let method = MethodShape {
        comment: format!("List the {} resources", cfg.resource),
        input: request.type_ref(),
        output: response.type_ref(),
        options: ctx.http_options(rule, signature),
        name,
    };

    Ok(GeneratedMethod {
        messages: vec![request, response],
        method,
    })
}
