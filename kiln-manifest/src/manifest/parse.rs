//! Manifest parsing from files and strings.

use std::str::FromStr;

use super::Manifest;
use crate::{Error, Result, error::SourceContext, validate::ParseContext};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "kiln.toml")
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);

    let codegen = ctx.push("codegen");
    codegen.validate_name(&manifest.codegen.module_name, "module name")?;
    if manifest.codegen.service.is_member() {
        let service = manifest.codegen.service.to_string();
        return Err(codegen.validation_error("service must be a shape, not a member", &service));
    }
    if manifest.codegen.model.as_os_str().is_empty() {
        return Err(ctx
            .source_context()
            .validation_error("model path cannot be empty", None));
    }

    ctx.push("runtime")
        .validate_name(&manifest.runtime.crate_prefix, "crate prefix")?;

    if let Some(enabled) = &manifest.decorators.enabled {
        for (i, name) in enabled.iter().enumerate() {
            if enabled[..i].contains(name) {
                let spans = crate::validate::find_value_spans(src, name);
                if let [first, second, ..] = spans.as_slice() {
                    return Err(ctx
                        .source_context()
                        .duplicate_decorator_error(name, *first, *second));
                }
                return Err(ctx
                    .push("decorators")
                    .validation_error(format!("decorator '{}' is enabled twice", name), name));
            }
        }
    }

    Ok(())
}
