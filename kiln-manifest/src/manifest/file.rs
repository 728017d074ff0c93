use std::path::{Path, PathBuf};

use super::{Manifest, parse_manifest};
use crate::{Error, Result};

/// A kiln.toml file with both raw content and parsed manifest.
#[derive(Debug, Clone)]
pub struct KilnToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl KilnToml {
    /// Open and parse a kiln.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let manifest = parse_manifest(&content, &path.display().to_string())?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory containing the manifest; relative paths resolve against it.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Location of the JSON model.
    pub fn model_path(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.codegen.model)
    }

    /// Read the model file referenced by `[codegen].model`.
    pub fn read_model(&self) -> Result<String> {
        let path = self.model_path();
        std::fs::read_to_string(&path).map_err(|e| Box::new(Error::Io { path, source: e }))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"[codegen]
service = "example.weather#Weather"
model = "models/weather.json"
module-name = "weather_sdk"
"#;

    #[test]
    fn test_open_resolves_model_relative_to_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.toml");
        fs::write(&path, MANIFEST).unwrap();
        fs::create_dir_all(temp.path().join("models")).unwrap();
        fs::write(temp.path().join("models/weather.json"), "{}").unwrap();

        let file = KilnToml::open(&path).unwrap();

        assert_eq!(file.content(), MANIFEST);
        assert_eq!(file.model_path(), temp.path().join("models/weather.json"));
        assert_eq!(file.read_model().unwrap(), "{}");
    }

    #[test]
    fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = KilnToml::open(temp.path().join("kiln.toml")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
