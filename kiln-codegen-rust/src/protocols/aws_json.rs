use kiln_codegen::{
    CodegenContext, CodegenError,
    builder::CodeFragment,
    protocol::{Protocol, RequestSpec},
};
use kiln_model::{Model, ProtocolId, Shape};

use super::{generic_error_fn, server_marker, server_router};

/// `aws.protocols#awsJson1_0` and `aws.protocols#awsJson1_1`.
///
/// Every request is a `POST /` naming its operation in the target header
/// as `Service.Operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwsJson {
    V1_0,
    V1_1,
}

impl AwsJson {
    fn marker_name(&self) -> &'static str {
        match self {
            AwsJson::V1_0 => "AwsJson1_0",
            AwsJson::V1_1 => "AwsJson1_1",
        }
    }
}

impl Protocol for AwsJson {
    fn id(&self) -> ProtocolId {
        match self {
            AwsJson::V1_0 => ProtocolId::AwsJson1_0,
            AwsJson::V1_1 => ProtocolId::AwsJson1_1,
        }
    }

    fn marker_struct(&self, ctx: &CodegenContext) -> String {
        server_marker(ctx, self.marker_name())
    }

    fn router_type(&self, ctx: &CodegenContext) -> String {
        server_router(ctx)
    }

    fn request_spec(&self, model: &Model, operation: &Shape) -> Result<RequestSpec, CodegenError> {
        // Services are visited in id order, so the first binding wins.
        let service = model
            .shapes()
            .filter(|shape| matches!(shape.body, kiln_model::ShapeBody::Service { .. }))
            .find(|service| service.references().contains(&&operation.id))
            .ok_or_else(|| CodegenError::UnboundOperation {
                operation: operation.id.clone(),
            })?;
        Ok(RequestSpec::rpc(format!(
            "{}.{}",
            service.id.name(),
            operation.id.name()
        )))
    }

    fn parse_http_generic_error(&self, ctx: &CodegenContext, _operation: &Shape) -> CodeFragment {
        generic_error_fn(
            ctx,
            vec![CodeFragment::line(format!(
                "{}::protocol::aws_json::parse_generic_error(response.headers(), response.body().as_ref())",
                ctx.runtime_crate("types")
            ))],
        )
    }
}
