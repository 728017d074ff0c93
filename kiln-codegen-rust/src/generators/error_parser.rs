//! Client-side error response parsing (`protocol_serde.rs`).
//!
//! The protocol's generic error parser is emitted once; every operation
//! gets a `de_<operation>_error` function that runs it and then lets
//! decorators add to the error builder.

use eyre::{Result, eyre};
use kiln_codegen::{
    CodegenContext,
    builder::CodeFragment,
    customize::{OperationSection, Section},
};

use super::GeneratorContext;
use crate::{
    ast::{Fn, Param},
    protocols::GENERIC_ERROR_FN,
    rust_file::RustFile,
};

const BUILDER: &str = "builder";
const RESPONSE: &str = "response";

pub struct ErrorParserGenerator<'a> {
    ctx: &'a GeneratorContext<'a>,
}

impl<'a> ErrorParserGenerator<'a> {
    pub fn new(ctx: &'a GeneratorContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn render(&self) -> Result<String> {
        let operations = self.ctx.codegen.operations()?;
        // The parser depends on the protocol only, so any operation will do.
        let first = operations
            .first()
            .ok_or_else(|| eyre!("service `{}` has no operations", self.ctx.codegen.service()))?;

        let mut file = RustFile::new()
            .doc("Response deserializers.")
            .add(self.ctx.protocol.parse_http_generic_error(self.ctx.codegen, first));
        for operation in &operations {
            file = file.add(self.operation_error(&operation.id)?);
        }
        Ok(file.render())
    }

    fn operation_error(&self, operation: &kiln_model::ShapeId) -> Result<CodeFragment> {
        let types = self.ctx.types_crate();
        let extras = self.ctx.sections.render_sequence(&Section::Operation(
            OperationSection::PopulateGenericErrorExtras {
                operation,
                builder_name: BUILDER,
                response_name: RESPONSE,
            },
        ))?;

        Ok(Fn::new(format!(
            "de_{}_error",
            CodegenContext::operation_field_name(operation)
        ))
        .doc(format!("Error metadata of a failed `{}` response.", operation.name()))
        .param(Param::new(
            RESPONSE,
            format!("&{t}::http::Response<{t}::bytes::Bytes>", t = types),
        ))
        .returns(format!(
            "Result<{t}::error::ErrorMetadata, {t}::error::DecodeError>",
            t = types
        ))
        .body_line("#[allow(unused_mut)]")
        .body_line(format!("let mut {} = {}({})?;", BUILDER, GENERIC_ERROR_FN, RESPONSE))
        .body(extras)
        .body_line(format!("Ok({}.build())", BUILDER))
        .to_fragment())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use kiln_manifest::Mode;

    use super::*;
    use crate::generators::test_support::Fixture;

    #[test]
    fn test_rest_json_error_parsers() {
        let out = Fixture::weather(Mode::Client).with(|ctx| ErrorParserGenerator::new(ctx).render().unwrap());
        let end = out.find("/// Error metadata of a failed `GetCityImage`").unwrap();
        assert_snapshot!(&out[..end], @r#"
        //! Response deserializers.

        pub fn parse_http_generic_error(response: &kiln_types::http::Response<kiln_types::bytes::Bytes>) -> Result<kiln_types::error::ErrorMetadataBuilder, kiln_types::error::DecodeError> {
            kiln_types::protocol::rest_json::parse_generic_error(response.headers(), response.body().as_ref())
        }

        /// Error metadata of a failed `GetCity` response.
        pub fn de_get_city_error(response: &kiln_types::http::Response<kiln_types::bytes::Bytes>) -> Result<kiln_types::error::ErrorMetadata, kiln_types::error::DecodeError> {
            #[allow(unused_mut)]
            let mut builder = parse_http_generic_error(response)?;
            Ok(builder.build())
        }
        "#);
        assert_eq!(out.matches("pub fn de_").count(), 4);
        assert_eq!(out.matches("pub fn parse_http_generic_error").count(), 1);
    }
}
