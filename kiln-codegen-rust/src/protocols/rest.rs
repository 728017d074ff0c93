use kiln_codegen::{
    CodegenContext, CodegenError,
    builder::CodeFragment,
    protocol::{Protocol, RequestSpec},
};
use kiln_model::{Model, ProtocolId, Shape, TraitKind};

use super::{generic_error_fn, server_marker, server_router};

/// Requests are recognized by the operation's `http` binding.
fn http_request_spec(operation: &Shape) -> Result<RequestSpec, CodegenError> {
    operation
        .traits
        .http()
        .map(RequestSpec::from_http)
        .ok_or_else(|| CodegenError::MissingTrait {
            shape: operation.id.clone(),
            trait_id: TraitKind::Http.id(),
        })
}

/// `aws.protocols#restJson1`
#[derive(Debug, Clone, Copy, Default)]
pub struct RestJson1;

impl Protocol for RestJson1 {
    fn id(&self) -> ProtocolId {
        ProtocolId::RestJson1
    }

    fn marker_struct(&self, ctx: &CodegenContext) -> String {
        server_marker(ctx, "RestJson1")
    }

    fn router_type(&self, ctx: &CodegenContext) -> String {
        server_router(ctx)
    }

    fn request_spec(&self, _model: &Model, operation: &Shape) -> Result<RequestSpec, CodegenError> {
        http_request_spec(operation)
    }

    fn parse_http_generic_error(&self, ctx: &CodegenContext, _operation: &Shape) -> CodeFragment {
        let types = ctx.runtime_crate("types");
        generic_error_fn(
            ctx,
            vec![CodeFragment::line(format!(
                "{}::protocol::rest_json::parse_generic_error(response.headers(), response.body().as_ref())",
                types
            ))],
        )
    }
}

/// `aws.protocols#restXml`
#[derive(Debug, Clone, Copy, Default)]
pub struct RestXml;

impl RestXml {
    /// Expression parsing the `<Error>` document of a response body.
    pub fn base_generic_error(ctx: &CodegenContext) -> String {
        format!(
            "{}::protocol::rest_xml::parse_generic_error(response.body().as_ref())",
            ctx.runtime_crate("types")
        )
    }
}

impl Protocol for RestXml {
    fn id(&self) -> ProtocolId {
        ProtocolId::RestXml
    }

    fn marker_struct(&self, ctx: &CodegenContext) -> String {
        server_marker(ctx, "RestXml")
    }

    fn router_type(&self, ctx: &CodegenContext) -> String {
        server_router(ctx)
    }

    fn request_spec(&self, _model: &Model, operation: &Shape) -> Result<RequestSpec, CodegenError> {
        http_request_spec(operation)
    }

    fn parse_http_generic_error(&self, ctx: &CodegenContext, _operation: &Shape) -> CodeFragment {
        generic_error_fn(ctx, vec![CodeFragment::line(Self::base_generic_error(ctx))])
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kiln_codegen::testing;
    use kiln_manifest::Mode;
    use kiln_model::ShapeId;

    use super::*;

    fn operation(ctx: &CodegenContext, name: &str) -> Shape {
        let id: ShapeId = format!("example.weather#{}", name).parse().unwrap();
        ctx.model().expect_shape(&id).unwrap().clone()
    }

    #[test]
    fn test_request_spec_from_http_binding() {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        let spec = RestJson1
            .request_spec(ctx.model(), &operation(&ctx, "ListCities"))
            .unwrap();
        assert_eq!(
            spec,
            RequestSpec::from_http(&kiln_model::HttpTrait {
                method: "GET".into(),
                uri: "/cities?view=summary".into(),
                code: 200,
            })
        );
    }

    #[test]
    fn test_missing_http_trait_fails_fast() {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        let input = operation(&ctx, "GetCityInput");
        let err = RestXml.request_spec(ctx.model(), &input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape `example.weather#GetCityInput` is missing required trait `smithy.api#http`"
        );
    }

    #[test]
    fn test_rest_json_generic_error() {
        let ctx = testing::weather_context(Mode::Client).unwrap();
        let out = RestJson1
            .parse_http_generic_error(&ctx, &operation(&ctx, "GetCity"))
            .render();
        assert_snapshot!(out, @r"
        pub fn parse_http_generic_error(response: &kiln_types::http::Response<kiln_types::bytes::Bytes>) -> Result<kiln_types::error::ErrorMetadataBuilder, kiln_types::error::DecodeError> {
            kiln_types::protocol::rest_json::parse_generic_error(response.headers(), response.body().as_ref())
        }
        ");
    }

    #[test]
    fn test_markers() {
        let ctx = testing::weather_context(Mode::Server).unwrap();
        assert_eq!(RestXml.marker_struct(&ctx), "kiln_server::protocol::RestXml");
        assert_eq!(RestJson1.router_type(&ctx), "kiln_server::routing::Router");
    }
}
