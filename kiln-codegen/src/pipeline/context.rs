//! Compilation context passed through pipeline phases.

use eyre::{Result, eyre};

use super::diagnostic::{Diagnostic, Severity};
use crate::{CodegenContext, symbol::SymbolTable};

/// State carried through every pipeline phase.
#[derive(Debug)]
pub struct CompilationContext {
    /// Model, service and settings; the model is replaced by the transform phase.
    pub codegen: CodegenContext,
    /// Resolved symbols (populated by the target's resolve phase).
    pub symbols: Option<SymbolTable>,
    /// Symbol provider stages from the base outwards.
    pub resolver_stages: Vec<&'static str>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(codegen: CodegenContext) -> Self {
        Self {
            codegen,
            symbols: None,
            resolver_stages: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
            .count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// The resolved symbol table; fails if no resolve phase ran.
    pub fn symbols(&self) -> Result<&SymbolTable> {
        self.symbols
            .as_ref()
            .ok_or_else(|| eyre!("symbols not resolved - did the resolve phase run?"))
    }
}
