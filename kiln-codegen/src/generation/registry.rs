//! File registration for declarative code generation.
//!
//! Generators render every file up front and register it here; nothing
//! touches the disk until the whole crate rendered successfully, so a failing
//! run leaves no partial output.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = FileRegistry::new();
//!
//! registry.register(FileEntry::config("Cargo.toml", cargo_toml));
//! registry.register(FileEntry::generated("src/lib.rs", lib_rs));
//!
//! registry.write_all(&output_dir)?;
//! ```

use std::path::{Path, PathBuf};

use eyre::Result;
use kiln_core::{FileRules, GeneratedFile, Overwrite, WriteResult, write_file};

/// Category of generated file, determining generation order and behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    /// Package manifests (Cargo.toml). Written first, no header.
    Config,
    /// Generated Rust sources. Always overwritten, carry the generated header.
    Generated,
    /// Files the user owns once created. Only written if missing.
    Scaffold,
}

impl FileCategory {
    pub fn default_rules(&self) -> FileRules {
        match self {
            FileCategory::Config => FileRules::always_overwrite(),
            FileCategory::Generated => FileRules::generated(),
            FileCategory::Scaffold => FileRules::if_missing(),
        }
    }
}

/// A file to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Relative path from output directory.
    pub path: String,
    /// File content, without header.
    pub content: String,
    pub category: FileCategory,
    rules: Option<FileRules>,
}

impl FileEntry {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        category: FileCategory,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            category,
            rules: None,
        }
    }

    pub fn config(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Config)
    }

    pub fn generated(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Generated)
    }

    pub fn scaffold(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(path, content, FileCategory::Scaffold)
    }

    /// Register a [`GeneratedFile`], keeping its own rules.
    pub fn from_generated<F: GeneratedFile>(
        path: impl Into<String>,
        file: &F,
        category: FileCategory,
    ) -> Self {
        Self::new(path, file.render(), category).with_rules(file.rules())
    }

    /// Override the category's default rules.
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn rules(&self) -> FileRules {
        self.rules
            .unwrap_or_else(|| self.category.default_rules())
    }

    /// Content as written to disk, header included.
    pub fn contents(&self) -> String {
        match self.rules().header {
            Some(header) => format!("{}\n\n{}", header, self.content),
            None => self.content.clone(),
        }
    }

    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.full_path(base);
        match self.rules().overwrite {
            Overwrite::Always => {}
            Overwrite::IfMissing if path.exists() => {
                tracing::info!(path = %self.path, "kept existing file");
                return Ok(WriteResult::Skipped);
            }
            Overwrite::IfMissing => {}
        }
        write_file(&path, &self.contents())?;
        tracing::info!(path = %self.path, "wrote file");
        Ok(WriteResult::Written)
    }
}

/// Registry for collecting and writing generated files.
///
/// Entries come out in category order (Config -> Generated -> Scaffold),
/// keeping registration order within a category.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: FileEntry) {
        self.entries.push(entry);
    }

    pub fn register_all(&mut self, entries: impl IntoIterator<Item = FileEntry>) {
        self.entries.extend(entries);
    }

    /// All registered entries, sorted by category.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.category);
        sorted.into_iter()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every file as it would be written, without touching the disk.
    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries()
            .map(|e| PreviewEntry {
                path: e.path.clone(),
                content: e.contents(),
                category: e.category,
            })
            .collect()
    }

    /// Write all files to the output directory, in category order.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for entry in self.entries() {
            match entry.write(base)? {
                WriteResult::Written => stats.written_paths.push(entry.path.clone()),
                WriteResult::Skipped => stats.skipped_paths.push(entry.path.clone()),
            }
        }

        Ok(stats)
    }
}

/// A file as it would be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewEntry {
    pub path: String,
    pub content: String,
    pub category: FileCategory,
}

/// Statistics from a write operation.
#[derive(Debug, Default)]
pub struct WriteStats {
    pub written_paths: Vec<String>,
    /// Paths that already existed and were left alone.
    pub skipped_paths: Vec<String>,
}

impl WriteStats {
    pub fn written(&self) -> usize {
        self.written_paths.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped_paths.len()
    }

    pub fn total(&self) -> usize {
        self.written() + self.skipped()
    }
}
