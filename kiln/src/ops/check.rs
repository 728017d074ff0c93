//! Check operation - model and manifest validation.

use std::{path::Path, sync::Arc};

use eyre::{Context, Result};
use kiln_codegen::{
    CodegenContext,
    pipeline::{
        CompilationContext, Diagnostic, Phase, Severity,
        phases::{TransformPhase, ValidatePhase},
    },
};
use kiln_codegen_rust::{ResolvePhase, decorators::select_decorators};
use kiln_manifest::Manifest;
use kiln_model::Model;

use super::describe;
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs the pipeline phase by phase so that validation errors come back
/// as diagnostics instead of aborting the run. Symbols are resolved only
/// when validation passed.
pub fn check(manifest: &Manifest, model: Model, config_path: &Path) -> Result<CheckReport> {
    let decorators = Arc::new(select_decorators(&manifest.decorators)?);
    let mut ctx = CompilationContext::new(CodegenContext::new(model, manifest));

    TransformPhase::new(Arc::clone(&decorators))
        .run(&mut ctx)
        .wrap_err("Transform failed")?;
    let validate = ValidatePhase::new();
    if validate.run(&mut ctx).is_ok() {
        let resolve = ResolvePhase::new(decorators);
        if let Err(e) = resolve.run(&mut ctx) {
            ctx.add_diagnostic(Diagnostic::error(resolve.name(), format!("{:#}", e)));
        }
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();
    for diag in &ctx.diagnostics {
        let msg = describe(diag);
        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        errors,
        warnings,
        infos,
    })
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing;
    use kiln_manifest::{Mode, parse_manifest};

    use super::*;

    fn manifest() -> Manifest {
        parse_manifest(&testing::weather_manifest(Mode::Server), "kiln.toml").unwrap()
    }

    #[test]
    fn test_valid_model() {
        let model = Model::from_json_str(testing::WEATHER_MODEL).unwrap();
        let report = check(&manifest(), model, Path::new("kiln.toml")).unwrap();
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn test_missing_protocol_is_reported() {
        let json = testing::WEATHER_MODEL.replace("\"aws.protocols#restJson1\": {},", "");
        let model = Model::from_json_str(&json).unwrap();
        let report = check(&manifest(), model, Path::new("kiln.toml")).unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
    }
}
