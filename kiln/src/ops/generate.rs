//! Generate operation - render the SDK crate and write or preview it.

use std::path::Path;

use eyre::{Context, Result};
use kiln_codegen::pipeline::DenyWarnings;
use kiln_codegen_rust::Generator;
use kiln_manifest::Manifest;
use kiln_model::Model;

use super::describe;
use crate::reports::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Output directory for the generated crate.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Fail the run when validation reports warnings.
    pub deny_warnings: bool,
}

/// Execute the generate operation.
///
/// Nothing is written unless the whole crate rendered.
pub fn generate(manifest: &Manifest, model: Model, opts: GenerateOptions) -> Result<GenerateReport> {
    let generator = Generator::from_manifest(model, manifest)?;
    let mut pipeline = generator.pipeline();
    if opts.deny_warnings {
        pipeline = pipeline.plugin(DenyWarnings);
    }
    let compiled = pipeline
        .run(generator.context().clone())
        .wrap_err("Pipeline failed")?;
    let warnings = compiled.warnings().map(describe).collect();
    let operation_count = compiled.codegen.operations()?.len();

    let files = generator
        .render_compiled(&compiled)
        .wrap_err("Failed to generate code")?;
    let result = if opts.dry_run {
        GenerationResult::Preview(PreviewResult {
            files: files
                .preview()
                .into_iter()
                .map(|f| PreviewFile {
                    path: f.path,
                    content: f.content,
                })
                .collect(),
        })
    } else {
        let stats = files
            .write_all(opts.output_dir)
            .wrap_err("Failed to write generated files")?;
        tracing::info!(
            written = stats.written(),
            skipped = stats.skipped(),
            output = %opts.output_dir.display(),
            "crate written"
        );
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            written: stats.written_paths,
            skipped: stats.skipped_paths,
        })
    };

    Ok(GenerateReport {
        module_name: manifest.codegen.module_name.clone(),
        module_version: manifest.codegen.module_version.to_string(),
        service: manifest.codegen.service.to_string(),
        mode: manifest.codegen.mode.to_string(),
        operation_count,
        warnings,
        result,
    })
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing;
    use kiln_manifest::{Mode, parse_manifest};
    use tempfile::TempDir;

    use super::*;

    fn weather() -> (Manifest, Model) {
        let manifest = parse_manifest(&testing::weather_manifest(Mode::Server), "kiln.toml").unwrap();
        let model = Model::from_json_str(testing::WEATHER_MODEL).unwrap();
        (manifest, model)
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (manifest, model) = weather();
        let dir = TempDir::new().unwrap();
        let report = generate(
            &manifest,
            model,
            GenerateOptions {
                output_dir: dir.path(),
                dry_run: true,
                deny_warnings: true,
            },
        )
        .unwrap();

        assert_eq!(report.operation_count, 4);
        match report.result {
            GenerationResult::Preview(preview) => assert_eq!(preview.files.len(), 8),
            GenerationResult::Written(_) => panic!("expected a preview"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writes_crate() {
        let (manifest, model) = weather();
        let dir = TempDir::new().unwrap();
        let report = generate(
            &manifest,
            model,
            GenerateOptions {
                output_dir: dir.path(),
                dry_run: false,
                deny_warnings: false,
            },
        )
        .unwrap();

        match report.result {
            GenerationResult::Written(written) => {
                assert_eq!(written.written.len(), 8);
                assert!(written.skipped.is_empty());
            }
            GenerationResult::Preview(_) => panic!("expected written files"),
        }
        assert!(dir.path().join("src/service.rs").exists());
    }
}
