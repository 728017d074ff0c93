//! Protocol generators for the Rust target.
//!
//! Every protocol knows how a server recognizes its requests
//! ([`RequestSpec`](kiln_codegen::protocol::RequestSpec)) and how a client
//! reads the generic error fields out of a failed response.

mod aws_json;
mod rest;

use std::sync::Arc;

use kiln_codegen::{
    CodegenContext,
    builder::CodeFragment,
    protocol::{Protocol, ProtocolMap},
};

pub use aws_json::AwsJson;
pub use rest::{RestJson1, RestXml};

use crate::ast::{Fn, Param};

/// The protocols every run starts with, before decorators adjust them.
pub fn default_protocols() -> ProtocolMap {
    let protocols: [Arc<dyn Protocol>; 4] = [
        Arc::new(RestJson1),
        Arc::new(RestXml),
        Arc::new(AwsJson::V1_0),
        Arc::new(AwsJson::V1_1),
    ];
    protocols.into_iter().map(|p| (p.id(), p)).collect()
}

/// Name of the generated generic error parser.
pub const GENERIC_ERROR_FN: &str = "parse_http_generic_error";

/// `pub fn parse_http_generic_error(response) -> Result<ErrorMetadataBuilder, DecodeError>`
/// around a protocol-specific body.
pub fn generic_error_fn(ctx: &CodegenContext, body: Vec<CodeFragment>) -> CodeFragment {
    let types = ctx.runtime_crate("types");
    Fn::new(GENERIC_ERROR_FN)
        .param(Param::new(
            "response",
            format!("&{t}::http::Response<{t}::bytes::Bytes>", t = types),
        ))
        .returns(format!(
            "Result<{t}::error::ErrorMetadataBuilder, {t}::error::DecodeError>",
            t = types
        ))
        .body(CodeFragment::sequence(body))
        .to_fragment()
}

/// Runtime path of a protocol's marker type in the server crate.
fn server_marker(ctx: &CodegenContext, name: &str) -> String {
    format!("{}::protocol::{}", ctx.runtime_crate("server"), name)
}

fn server_router(ctx: &CodegenContext) -> String {
    format!("{}::routing::Router", ctx.runtime_crate("server"))
}
