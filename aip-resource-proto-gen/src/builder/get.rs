//! Get method (AIP-131)

use super::{GeneratedMethod, MethodContext};
use crate::annotations::{HttpRule, HttpVerb, required};
use crate::config::Method;
use crate::error::GeneratorError;
use crate::ir::{FieldShape, MethodShape};

pub(super) fn build(ctx: &MethodContext<'_>) -> Result<GeneratedMethod, GeneratorError> {
    let name = ctx.method_name(Method::Get);

    let mut request = ctx.request(Method::Get);
    request.add_field(
        FieldShape::string("name")
            .with_comment("The name of the resource to retrieve.")
            .with_options(required()),
    )?;

    let rule = HttpRule::new(
        HttpVerb::Get,
        format!("/v1/{{name={}}}", ctx.cfg.name_url_ref()),
    );

    let method = MethodShape {
        comment: format!("Get the {} resource", ctx.cfg.resource),
        input: request.type_ref(),
        output: ctx.resource.clone(),
        options: ctx.http_options(rule, vec!["name".to_string()]),
        name,
    };

    Ok(GeneratedMethod {
        messages: vec![request],
        method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceConfig;
    use crate::ir::TypeRef;
    use crate::well_known;

    #[test]
    fn test_get_with_parent() {
        let mut cfg = ResourceConfig::new("Book", "library.v1", "library.example.com");
        cfg.parent_pattern = Some("publishers/{publisher}".to_string());
        let resource = TypeRef::Local("Book".to_string());
        let pool = well_known::default_pool();
        let ctx = MethodContext {
            cfg: &cfg,
            resource: &resource,
            pool: &pool,
        };

        let generated = build(&ctx).unwrap();
        assert_eq!(generated.messages.len(), 1);
        assert_eq!(generated.messages[0].name, "GetBookRequest");
        assert_eq!(generated.messages[0].field_names(), vec!["name"]);

        let method = generated.method;
        assert_eq!(method.name, "GetBook");
        assert_eq!(method.input.name(), "GetBookRequest");
        assert_eq!(method.output.name(), "Book");

        let options = method.options.unwrap();
        let http = options.http.unwrap();
        assert_eq!(http.verb, HttpVerb::Get);
        assert_eq!(http.path, "/v1/{name=publishers/*/books/*}");
        assert_eq!(http.body, None);
        assert_eq!(options.signature, vec!["name"]);
    }
}
