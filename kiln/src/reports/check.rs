//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Diagnostics from checking a model against its manifest.
#[derive(Debug)]
pub struct CheckReport {
    pub config_path: PathBuf,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.diagnostic("error", error);
        }
        for warning in &self.warnings {
            out.diagnostic("warning", warning);
        }
        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if self.is_valid() {
            if !self.warnings.is_empty() {
                out.newline();
            }
            out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        } else {
            out.newline();
            out.preformatted(&format!(
                "✗ {} error{}, {} warning{}",
                self.errors.len(),
                if self.errors.len() == 1 { "" } else { "s" },
                self.warnings.len(),
                if self.warnings.len() == 1 { "" } else { "s" },
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::BufferOutput;

    #[test]
    fn test_failed_check_summary() {
        let report = CheckReport {
            config_path: PathBuf::from("kiln.toml"),
            errors: vec!["service declares no supported protocol trait".into()],
            warnings: vec![],
            infos: vec![],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert!(!report.is_valid());
        assert_eq!(out.lines.last().unwrap(), "✗ 1 error, 0 warnings");
    }

    #[test]
    fn test_valid_check() {
        let report = CheckReport {
            config_path: PathBuf::from("kiln.toml"),
            errors: vec![],
            warnings: vec![],
            infos: vec![],
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(out.lines, ["✓ kiln.toml is valid"]);
    }
}
