//! Customizations for Amazon S3.

use std::sync::Arc;

use eyre::Result;
use kiln_codegen::{
    CodegenContext, CodegenError,
    builder::CodeFragment,
    customize::{Decorator, LibRsSection, OperationSection, Section},
    protocol::{Protocol, ProtocolMap, RequestSpec},
};
use kiln_model::{Model, ProtocolId, Shape, ShapeId, Trait};

use crate::protocols::{RestXml, generic_error_fn};

const S3_SERVICE: &str = "com.amazonaws.s3#AmazonS3";

/// Structures whose XML root element does not match their name.
const INVALID_XML_ROOT_ALLOW_LIST: [&str; 1] = ["com.amazonaws.s3#GetObjectAttributesOutput"];

fn applies(service: &ShapeId) -> bool {
    service.to_string() == S3_SERVICE
}

/// Top level decorator for S3. Every hook passes through unchanged for
/// other services.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Decorator;

impl Decorator for S3Decorator {
    fn name(&self) -> &'static str {
        "s3"
    }

    fn section(&self, ctx: &CodegenContext, section: &Section<'_>) -> Result<Option<CodeFragment>> {
        if !applies(ctx.service()) {
            return Ok(None);
        }
        let s3 = format!("{}::s3", ctx.runtime_crate("types"));
        match section {
            Section::Operation(OperationSection::PopulateGenericErrorExtras {
                builder_name,
                response_name,
                ..
            }) => Ok(Some(CodeFragment::line(format!(
                "{builder} = {s3}::apply_extended_error({builder}, {response}.headers());",
                builder = builder_name,
                s3 = s3,
                response = response_name,
            )))),
            Section::LibRs(LibRsSection::Body) => {
                Ok(Some(CodeFragment::line(format!("pub use {}::ErrorExt;", s3))))
            }
            _ => Ok(None),
        }
    }

    fn transform_model(&self, service: &ShapeId, model: Model) -> Result<Model> {
        if !applies(service) {
            return Ok(model);
        }
        let model = model
            .to_builder()
            .map_shapes(|shape| {
                let allowed = shape.is_structure()
                    && INVALID_XML_ROOT_ALLOW_LIST.contains(&shape.id.to_string().as_str());
                if allowed {
                    tracing::info!(shape = %shape.id, "adding allow-invalid-xml-root");
                    shape.with_trait(Trait::AllowInvalidXmlRoot)
                } else {
                    shape
                }
            })
            .build()?;
        Ok(model)
    }

    fn protocols(&self, service: &ShapeId, mut protocols: ProtocolMap) -> ProtocolMap {
        if applies(service) {
            protocols.insert(ProtocolId::RestXml, Arc::new(S3ProtocolOverride));
        }
        protocols
    }
}

/// `restXml` with S3's generic error parsing.
///
/// HEAD responses carry no body to read an error code from, so an empty
/// 404 response is reported as `NotFound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3ProtocolOverride;

impl Protocol for S3ProtocolOverride {
    fn id(&self) -> ProtocolId {
        RestXml.id()
    }

    fn marker_struct(&self, ctx: &CodegenContext) -> String {
        RestXml.marker_struct(ctx)
    }

    fn router_type(&self, ctx: &CodegenContext) -> String {
        RestXml.router_type(ctx)
    }

    fn request_spec(&self, model: &Model, operation: &Shape) -> Result<RequestSpec, CodegenError> {
        RestXml.request_spec(model, operation)
    }

    fn parse_http_generic_error(&self, ctx: &CodegenContext, _operation: &Shape) -> CodeFragment {
        let error = format!("{}::error::ErrorMetadata", ctx.runtime_crate("types"));
        generic_error_fn(
            ctx,
            vec![
                CodeFragment::block(
                    "if response.body().is_empty() {",
                    vec![
                        CodeFragment::line(format!("let mut builder = {}::builder();", error)),
                        CodeFragment::braced(
                            "if response.status().as_u16() == 404 {",
                            vec![CodeFragment::line("builder = builder.code(\"NotFound\");")],
                        ),
                        CodeFragment::line("Ok(builder)"),
                    ],
                    Some("} else {".to_string()),
                ),
                CodeFragment::indent(vec![CodeFragment::line(RestXml::base_generic_error(ctx))]),
                CodeFragment::line("}"),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kiln_codegen::{
        customize::CombinedDecorator,
        protocol::resolve_protocol,
        testing::{self, WEATHER_MODEL},
    };
    use kiln_manifest::Mode;
    use kiln_model::TraitKind;

    use super::*;
    use crate::protocols::default_protocols;

    const S3_MODEL: &str = r#"{
        "smithy": "2.0",
        "shapes": {
            "com.amazonaws.s3#AmazonS3": {
                "type": "service",
                "version": "2006-03-01",
                "operations": [{ "target": "com.amazonaws.s3#GetObjectAttributes" }],
                "traits": { "aws.protocols#restXml": {} }
            },
            "com.amazonaws.s3#GetObjectAttributes": {
                "type": "operation",
                "output": { "target": "com.amazonaws.s3#GetObjectAttributesOutput" },
                "traits": {
                    "smithy.api#http": { "method": "GET", "uri": "/{Bucket}/{Key+}?attributes" }
                }
            },
            "com.amazonaws.s3#GetObjectAttributesOutput": {
                "type": "structure",
                "members": {
                    "ETag": { "target": "smithy.api#String" }
                }
            }
        }
    }"#;

    fn s3_context() -> CodegenContext {
        let manifest = r#"[codegen]
service = "com.amazonaws.s3#AmazonS3"
model = "s3.json"
module-name = "s3"
mode = "client"
"#;
        testing::context_from(S3_MODEL, manifest).unwrap()
    }

    fn render(ctx: &CodegenContext, section: &Section<'_>) -> String {
        let combined = CombinedDecorator::new(vec![Arc::new(S3Decorator)]).unwrap();
        let registry = combined.section_registry(ctx).unwrap();
        registry.render_sequence(section).unwrap().render()
    }

    #[test]
    fn test_error_extras_and_pub_use() {
        let ctx = s3_context();
        let op: ShapeId = "com.amazonaws.s3#GetObjectAttributes".parse().unwrap();
        let extras = render(
            &ctx,
            &Section::Operation(OperationSection::PopulateGenericErrorExtras {
                operation: &op,
                builder_name: "builder",
                response_name: "response",
            }),
        );
        assert_eq!(
            extras,
            "builder = kiln_types::s3::apply_extended_error(builder, response.headers());\n"
        );
        assert_eq!(
            render(&ctx, &Section::LibRs(LibRsSection::Body)),
            "pub use kiln_types::s3::ErrorExt;\n"
        );
    }

    #[test]
    fn test_other_services_are_untouched() {
        let ctx = testing::weather_context(Mode::Client).unwrap();
        assert_eq!(render(&ctx, &Section::LibRs(LibRsSection::Body)), "");

        let protocols = S3Decorator.protocols(ctx.service(), default_protocols());
        let service = ctx.service_shape().unwrap();
        let protocol = resolve_protocol(service, &protocols).unwrap();
        assert_eq!(protocol.id(), ProtocolId::RestJson1);

        let model = Model::from_json_str(WEATHER_MODEL).unwrap();
        let transformed = S3Decorator
            .transform_model(ctx.service(), model.clone())
            .unwrap();
        assert_eq!(transformed, model);
    }

    #[test]
    fn test_allow_list_gets_trait() {
        let ctx = s3_context();
        let model = S3Decorator
            .transform_model(ctx.service(), (**ctx.model()).clone())
            .unwrap();
        let id: ShapeId = "com.amazonaws.s3#GetObjectAttributesOutput".parse().unwrap();
        let shape = model.expect_shape(&id).unwrap();
        assert!(shape.traits.has(TraitKind::AllowInvalidXmlRoot));
    }

    #[test]
    fn test_protocol_override() {
        let ctx = s3_context();
        let protocols = S3Decorator.protocols(ctx.service(), default_protocols());
        let protocol = resolve_protocol(ctx.service_shape().unwrap(), &protocols).unwrap();
        let op: ShapeId = "com.amazonaws.s3#GetObjectAttributes".parse().unwrap();
        let op = ctx.model().expect_shape(&op).unwrap();

        assert_snapshot!(protocol.parse_http_generic_error(&ctx, op).render(), @r#"
        pub fn parse_http_generic_error(response: &kiln_types::http::Response<kiln_types::bytes::Bytes>) -> Result<kiln_types::error::ErrorMetadataBuilder, kiln_types::error::DecodeError> {
            if response.body().is_empty() {
                let mut builder = kiln_types::error::ErrorMetadata::builder();
                if response.status().as_u16() == 404 {
                    builder = builder.code("NotFound");
                }
                Ok(builder)
            } else {
                kiln_types::protocol::rest_xml::parse_generic_error(response.body().as_ref())
            }
        }
        "#);
        assert!(protocol.request_spec(ctx.model(), op).is_ok());
    }

    #[test]
    fn test_other_rest_xml_services_keep_default_parser() {
        let model = S3_MODEL.replace("com.amazonaws.s3#AmazonS3", "example.storage#Storage");
        let manifest = r#"[codegen]
service = "example.storage#Storage"
model = "storage.json"
module-name = "storage"
mode = "client"
"#;
        let ctx = testing::context_from(&model, manifest).unwrap();
        let protocols = S3Decorator.protocols(ctx.service(), default_protocols());
        let protocol = resolve_protocol(ctx.service_shape().unwrap(), &protocols).unwrap();
        let op: ShapeId = "com.amazonaws.s3#GetObjectAttributes".parse().unwrap();
        let op = ctx.model().expect_shape(&op).unwrap();

        assert_eq!(protocol.id(), ProtocolId::RestXml);
        let parser = protocol.parse_http_generic_error(&ctx, op).render();
        assert_eq!(parser, RestXml.parse_http_generic_error(&ctx, op).render());
        assert!(parser.contains(&RestXml::base_generic_error(&ctx)), "{parser}");
        assert!(!parser.contains("NotFound"), "{parser}");
        assert!(!parser.contains("404"), "{parser}");

        // The allow-listed shape id is S3's, but the service is not.
        let transformed = S3Decorator
            .transform_model(ctx.service(), (**ctx.model()).clone())
            .unwrap();
        let id: ShapeId = "com.amazonaws.s3#GetObjectAttributesOutput".parse().unwrap();
        assert!(!transformed.expect_shape(&id).unwrap().traits.has(TraitKind::AllowInvalidXmlRoot));
        assert_eq!(render(&ctx, &Section::LibRs(LibRsSection::Body)), "");
    }
}
