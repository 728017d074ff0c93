use std::path::{Path, PathBuf};

use kiln_codegen::CodegenContext;
use kiln_core::{FileRules, GeneratedFile, Version};

const DEFAULT_EDITION: &str = "2024";

/// Runtime crates a generated crate may depend on, by suffix.
const RUNTIME_CRATES: [&str; 2] = ["server", "types"];

/// The Cargo.toml of the generated crate
pub struct CargoToml {
    pub name: String,
    pub version: Version,
    pub edition: String,
    pub description: Option<String>,
    /// `(name, rendered TOML value)`
    pub dependencies: Vec<(String, String)>,
}

fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl CargoToml {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Version::new(0, 1, 0),
            edition: DEFAULT_EDITION.to_string(),
            description: None,
            dependencies: Vec::new(),
        }
    }

    /// Manifest for the crate generated in `ctx`, depending on the runtime
    /// crates by version, or by path when a local runtime checkout is set.
    ///
    /// Only runtime crates that `sources` refer to are declared.
    pub fn from_context<'s>(
        ctx: &CodegenContext,
        sources: impl IntoIterator<Item = &'s str>,
    ) -> Self {
        let settings = ctx.settings();
        let runtime = ctx.runtime();
        let cargo = Self::new(&settings.module_name)
            .with_version(settings.module_version.clone())
            .with_description(settings.module_description.clone());

        let sources: Vec<&str> = sources.into_iter().collect();
        let used = RUNTIME_CRATES.iter().filter(|suffix| {
            let prefix = format!("{}::", ctx.runtime_crate(suffix));
            sources.iter().any(|source| source.contains(&prefix))
        });
        used.fold(cargo, |cargo, suffix| {
            let name = runtime.crate_name(suffix);
            match &runtime.path {
                Some(root) => {
                    let path = root.join(&name);
                    cargo.with_path_dependency(name, &path)
                }
                None => cargo.with_dependency(name, runtime.version.compatible_requirement()),
            }
        })
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// A registry dependency on `requirement`.
    pub fn with_dependency(mut self, name: impl Into<String>, requirement: impl AsRef<str>) -> Self {
        self.dependencies
            .push((name.into(), quoted(requirement.as_ref())));
        self
    }

    pub fn with_path_dependency(mut self, name: impl Into<String>, path: &Path) -> Self {
        let path = path.to_string_lossy();
        self.dependencies
            .push((name.into(), format!("{{ path = {} }}", quoted(&path))));
        self
    }
}

impl GeneratedFile for CargoToml {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("Cargo.toml")
    }

    fn rules(&self) -> FileRules {
        FileRules::always_overwrite()
    }

    fn render(&self) -> String {
        let mut out = format!(
            "[package]\nname = {}\nversion = {}\nedition = {}\n",
            quoted(&self.name),
            quoted(&self.version.to_string()),
            quoted(&self.edition)
        );
        if let Some(description) = &self.description {
            out.push_str(&format!("description = {}\n", quoted(description)));
        }

        out.push_str("\n[dependencies]\n");
        for (name, value) in &self.dependencies {
            out.push_str(&format!("{} = {}\n", name, value));
        }
        out
    }
}
