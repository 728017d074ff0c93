//! Info command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// What a generation run would use: service, pipeline and extension points.
#[derive(Debug)]
pub struct InfoReport {
    pub module_name: String,
    pub module_version: String,
    pub description: Option<String>,
    pub service: String,
    pub mode: String,
    pub protocols: Vec<String>,
    pub config_path: PathBuf,
    pub model_path: PathBuf,
    /// Operation shape ids, in generation order.
    pub operations: Vec<String>,
    /// Pipeline phases in run order.
    pub phases: Vec<&'static str>,
    /// Symbol provider stages, innermost first.
    pub resolver_stages: Vec<&'static str>,
    /// Enabled decorators in effective order.
    pub decorators: Vec<&'static str>,
    /// Lints run by the validate phase.
    pub lints: Vec<CatalogEntry>,
    /// Customization points decorators can write into.
    pub sections: Vec<CatalogEntry>,
}

/// A named extension point or check and what it is for.
#[derive(Debug)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

impl Report for InfoReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("{} v{}", self.module_name, self.module_version));
        if let Some(desc) = &self.description {
            out.preformatted(desc);
        }
        out.newline();

        out.key_value("Service", &self.service);
        out.key_value("Mode", &self.mode);
        out.key_value("Protocol", &self.protocols.join(", "));
        out.key_value("Config", &self.config_path.display().to_string());
        out.key_value("Model", &self.model_path.display().to_string());
        out.newline();

        out.section(&format!("Operations ({})", self.operations.len()));
        for op in &self.operations {
            out.list_item(op);
        }
        out.newline();

        out.section("Pipeline");
        for (i, phase) in self.phases.iter().enumerate() {
            out.numbered_item(i + 1, phase);
        }
        out.newline();

        out.section("Symbol providers");
        for (i, stage) in self.resolver_stages.iter().enumerate() {
            out.numbered_item(i + 1, stage);
        }
        out.newline();

        out.section("Decorators");
        if self.decorators.is_empty() {
            out.list_item("(none)");
        }
        for decorator in &self.decorators {
            out.list_item(decorator);
        }
        out.newline();

        out.section("Lints");
        for lint in &self.lints {
            out.list_item(&format!("{:<24}{}", lint.name, lint.description));
        }
        out.newline();

        out.section("Sections");
        for section in &self.sections {
            out.list_item(&format!("{:<24}{}", section.name, section.description));
        }
    }
}
