use std::{path::Path, sync::Arc};

use eyre::Result;
use kiln_codegen::{
    CodegenContext,
    customize::CombinedDecorator,
    generation::{FileCategory, FileEntry, FileRegistry},
    language::{GenerateResult, LanguageCodegen, PreviewFile},
    pipeline::{CompilationContext, Pipeline},
    protocol::resolve_protocol,
};
use kiln_manifest::{Manifest, Mode};
use kiln_model::Model;

use crate::{
    decorators::select_decorators,
    generators::{
        CargoToml, ConfigGenerator, ErrorParserGenerator, GeneratorContext, LibRsGenerator,
        ServiceGenerator, StructureGenerator,
    },
    protocols::default_protocols,
    resolve::ResolvePhase,
};

/// Rust code generator producing a server or client crate for one service.
pub struct Generator {
    codegen: CodegenContext,
    decorators: Arc<CombinedDecorator>,
}

impl LanguageCodegen for Generator {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn preview(&self) -> Result<Vec<PreviewFile>> {
        Ok(self
            .render()?
            .preview()
            .into_iter()
            .map(|entry| PreviewFile {
                path: entry.path,
                content: entry.content,
            })
            .collect())
    }

    fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        // Everything is rendered before the first write, so a failing run
        // leaves the output directory untouched.
        let files = self.render()?;
        let stats = files.write_all(output_dir)?;
        tracing::info!(
            written = stats.written(),
            skipped = stats.skipped(),
            output = %output_dir.display(),
            "generation finished"
        );
        Ok(GenerateResult {
            written: stats.written_paths,
            skipped: stats.skipped_paths,
        })
    }
}

impl Generator {
    pub fn new(codegen: CodegenContext, decorators: CombinedDecorator) -> Self {
        Self {
            codegen,
            decorators: Arc::new(decorators),
        }
    }

    /// A generator for `manifest` with the decorators it enables.
    pub fn from_manifest(model: Model, manifest: &Manifest) -> Result<Self> {
        let decorators = select_decorators(&manifest.decorators)?;
        Ok(Self::new(CodegenContext::new(model, manifest), decorators))
    }

    pub fn context(&self) -> &CodegenContext {
        &self.codegen
    }

    pub fn decorators(&self) -> &CombinedDecorator {
        &self.decorators
    }

    /// Transform, validate, then resolve symbols.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(Arc::clone(&self.decorators))
            .phase(ResolvePhase::new(Arc::clone(&self.decorators)))
    }

    pub fn compile(&self) -> Result<CompilationContext> {
        self.pipeline().run(self.codegen.clone())
    }

    /// Every file of the generated crate, rendered but not written.
    pub fn render(&self) -> Result<FileRegistry> {
        self.render_compiled(&self.compile()?)
    }

    /// Render from an already compiled run, e.g. one whose diagnostics
    /// were inspected first.
    pub fn render_compiled(&self, compiled: &CompilationContext) -> Result<FileRegistry> {
        let codegen = &compiled.codegen;

        let protocols = self
            .decorators
            .protocols(codegen.service(), default_protocols());
        let protocol = resolve_protocol(codegen.service_shape()?, &protocols)?;
        let sections = self.decorators.section_registry(codegen)?;
        let ctx = GeneratorContext {
            codegen,
            symbols: compiled.symbols()?,
            sections: &sections,
            protocol,
        };
        tracing::debug!(
            service = %codegen.service(),
            mode = %codegen.mode(),
            protocol = %ctx.protocol.id(),
            "rendering crate"
        );

        let mut sources = vec![FileEntry::generated(
            "src/lib.rs",
            LibRsGenerator::new(&ctx).render()?,
        )];
        sources.extend(
            StructureGenerator::new(&ctx)
                .render_all()?
                .into_iter()
                .map(|(path, content)| FileEntry::generated(path, content)),
        );
        sources.push(FileEntry::generated(
            "src/service.rs",
            ServiceGenerator::new(&ctx).render()?,
        ));
        if codegen.mode() == Mode::Client {
            sources.push(FileEntry::generated(
                "src/config.rs",
                ConfigGenerator::new(&ctx).render()?,
            ));
            sources.push(FileEntry::generated(
                "src/protocol_serde.rs",
                ErrorParserGenerator::new(&ctx).render()?,
            ));
        }

        let cargo = CargoToml::from_context(
            codegen,
            sources.iter().map(|file| file.content.as_str()),
        );
        let mut files = FileRegistry::new();
        files.register(FileEntry::from_generated("Cargo.toml", &cargo, FileCategory::Config));
        files.register_all(sources);
        tracing::debug!(files = files.len(), "crate rendered");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing;
    use kiln_core::GENERATED_HEADER;
    use tempfile::TempDir;

    use super::*;
    use crate::decorators::builtin_decorators;

    fn weather(mode: Mode) -> Generator {
        Generator::new(
            testing::weather_context(mode).unwrap(),
            CombinedDecorator::new(builtin_decorators()).unwrap(),
        )
    }

    fn paths(generator: &Generator) -> Vec<String> {
        generator
            .preview()
            .unwrap()
            .into_iter()
            .map(|f| f.path)
            .collect()
    }

    #[test]
    fn test_server_file_set() {
        assert_eq!(
            paths(&weather(Mode::Server)),
            [
                "Cargo.toml",
                "src/lib.rs",
                "src/error.rs",
                "src/input.rs",
                "src/model.rs",
                "src/operation.rs",
                "src/output.rs",
                "src/service.rs",
            ]
        );
    }

    #[test]
    fn test_client_file_set() {
        let paths = paths(&weather(Mode::Client));
        assert!(paths.contains(&"src/config.rs".to_string()));
        assert!(paths.contains(&"src/protocol_serde.rs".to_string()));
        assert_eq!(paths.len(), 10);
    }

    #[test]
    fn test_sources_carry_header_and_manifest_does_not() {
        let files = weather(Mode::Server).preview().unwrap();
        for file in &files {
            if file.path == "Cargo.toml" {
                assert!(file.content.starts_with("[package]"));
            } else {
                assert!(file.content.starts_with(GENERATED_HEADER), "{}", file.path);
            }
        }
    }

    #[test]
    fn test_manifest_declares_only_referenced_runtime_crates() {
        for mode in [Mode::Server, Mode::Client] {
            let files = weather(mode).preview().unwrap();
            let manifest = &files.iter().find(|f| f.path == "Cargo.toml").unwrap().content;
            for suffix in ["server", "types"] {
                let referenced = files
                    .iter()
                    .filter(|f| f.path != "Cargo.toml")
                    .any(|f| f.content.contains(&format!("kiln_{}::", suffix)));
                assert_eq!(
                    manifest.contains(&format!("kiln-{} =", suffix)),
                    referenced,
                    "{mode:?} {suffix}: {manifest}"
                );
            }
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let generator = weather(Mode::Server);
        assert_eq!(generator.preview().unwrap(), generator.preview().unwrap());
    }

    #[test]
    fn test_generate_writes_files() {
        let dir = TempDir::new().unwrap();
        let result = weather(Mode::Client).generate(dir.path()).unwrap();

        assert_eq!(result.written.len(), 10);
        assert!(result.skipped.is_empty());
        let lib = std::fs::read_to_string(dir.path().join("src/lib.rs")).unwrap();
        assert!(lib.contains("pub use config::Config;"));
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let model = testing::WEATHER_MODEL.replace("aws.protocols#restJson1", "example.other#unknown");
        let generator = Generator::new(
            testing::context_from(&model, &testing::weather_manifest(Mode::Server)).unwrap(),
            CombinedDecorator::empty(),
        );
        let dir = TempDir::new().unwrap();

        assert!(generator.generate(dir.path()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
