//! Info operation - what a run would do, without generating.

use std::path::Path;

use eyre::{Context, Result};
use kiln_codegen::{customize::SectionName, pipeline::phases::ValidatePhase};
use kiln_codegen_rust::Generator;
use kiln_manifest::KilnToml;
use kiln_model::Model;

use crate::reports::{CatalogEntry, InfoReport};

/// Execute the info operation.
///
/// Compiles the model and collects the service, the resolver stages and
/// the decorators in their effective order.
pub fn info(kiln_toml: &KilnToml, model: Model, config_path: &Path) -> Result<InfoReport> {
    let manifest = kiln_toml.manifest();
    let generator = Generator::from_manifest(model, manifest)?;
    let compiled = generator.compile().wrap_err("Pipeline failed")?;
    let codegen = &compiled.codegen;

    let protocols = codegen
        .service_shape()?
        .traits
        .protocols()
        .iter()
        .map(ToString::to_string)
        .collect();
    let operations = codegen
        .operations()?
        .iter()
        .map(|op| op.id.to_string())
        .collect();

    Ok(InfoReport {
        module_name: manifest.codegen.module_name.clone(),
        module_version: manifest.codegen.module_version.to_string(),
        description: manifest.codegen.module_description.clone(),
        service: codegen.service().to_string(),
        mode: codegen.mode().to_string(),
        protocols,
        config_path: std::fs::canonicalize(config_path)
            .unwrap_or_else(|_| config_path.to_path_buf()),
        model_path: kiln_toml.model_path(),
        operations,
        phases: generator.pipeline().phase_names(),
        resolver_stages: compiled.resolver_stages.clone(),
        decorators: generator.decorators().names(),
        lints: ValidatePhase::new()
            .lint_info()
            .into_iter()
            .map(|lint| CatalogEntry {
                name: lint.name,
                description: lint.description,
            })
            .collect(),
        sections: SectionName::ALL
            .iter()
            .map(|name| CatalogEntry {
                name: name.as_str(),
                description: name.description(),
            })
            .collect(),
    })
}
