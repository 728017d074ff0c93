//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Crate name of the generated module.
    pub module_name: String,
    pub module_version: String,
    /// Shape id of the generated service.
    pub service: String,
    /// `server` or `client`.
    pub mode: String,
    pub operation_count: usize,
    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,
    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    /// Files written, relative to the output directory.
    pub written: Vec<String>,
    /// Existing files left untouched.
    pub skipped: Vec<String>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.diagnostic("warning", warning);
        }
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&format!("{} v{}", self.module_name, self.module_version));
        out.preformatted(&format!(
            "{} {} for {} ({} operation{})",
            self.mode,
            if self.mode == "client" { "SDK" } else { "stubs" },
            self.service,
            self.operation_count,
            if self.operation_count == 1 { "" } else { "s" }
        ));
        out.newline();

        out.section(&format!("Generated in {}", written.output_dir.display()));
        for path in &written.written {
            out.added_item(path);
        }
        for path in &written.skipped {
            out.skipped_item(path);
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    fn report(result: GenerationResult) -> GenerateReport {
        GenerateReport {
            module_name: "weather-sdk".into(),
            module_version: "0.1.0".into(),
            service: "example.weather#Weather".into(),
            mode: "server".into(),
            operation_count: 1,
            warnings: vec!["operation `Ping` has no input".into()],
            result,
        }
    }

    #[test]
    fn test_written_lists_files() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Written(WrittenResult {
            output_dir: PathBuf::from("out"),
            written: vec!["src/lib.rs".into()],
            skipped: vec!["Cargo.toml".into()],
        }))
        .render(&mut out);

        assert_eq!(
            out.lines,
            [
                "warning: operation `Ping` has no input",
                "weather-sdk v0.1.0",
                "server stubs for example.weather#Weather (1 operation)",
                "",
                "Generated in out:",
                "+ src/lib.rs",
                "= Cargo.toml",
            ]
        );
    }

    #[test]
    fn test_preview_prints_files() {
        let mut out = BufferOutput::default();
        report(GenerationResult::Preview(PreviewResult {
            files: vec![PreviewFile {
                path: "src/lib.rs".into(),
                content: "mod service;".into(),
            }],
        }))
        .render(&mut out);

        assert!(out.lines.contains(&"-- src/lib.rs --".to_string()));
        assert_eq!(out.lines.last().unwrap(), "1 files would be generated");
    }
}
