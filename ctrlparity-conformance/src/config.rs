//! Harness configuration
//!
//! Defaults point at the vectors shipped with this crate and at
//! `target/equivalence` in the workspace. Environment variables override the
//! defaults when running under CI or against an external vector set.

use std::{
    env,
    path::{Path, PathBuf},
};

/// Overrides [`HarnessConfig::vectors_root`]
pub const VECTORS_DIR_ENV: &str = "CTRLPARITY_VECTORS_DIR";
/// Overrides [`HarnessConfig::output_root`]
pub const OUTPUT_DIR_ENV: &str = "CTRLPARITY_OUTPUT_DIR";
/// Overrides [`HarnessConfig::require_cases`] (`1`/`true`/`yes`/`on`)
pub const REQUIRE_CASES_ENV: &str = "CTRLPARITY_REQUIRE_CASES";

/// Where vectors are read from and artifacts are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Parent of the per-algorithm vector directories
    pub vectors_root: PathBuf,
    /// Parent of the per-algorithm artifact directories
    pub output_root: PathBuf,
    /// Reserved file name skipped during discovery
    pub schema_file_name: String,
    /// Extension of vector documents, without the dot
    pub document_extension: String,
    /// Fail suites that load zero cases
    pub require_cases: bool,
}

impl HarnessConfig {
    /// Paths relative to this crate's manifest directory
    #[must_use]
    pub fn default_paths() -> Self {
        let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        Self {
            vectors_root: crate_root.join("vectors"),
            output_root: crate_root.join("../target/equivalence"),
            schema_file_name: "schema.json".to_string(),
            document_extension: "json".to_string(),
            require_cases: false,
        }
    }

    /// Defaults with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        Self::default_paths().apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unset keys leave the field alone.
    #[must_use]
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(VECTORS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.vectors_root = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            self.output_root = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(REQUIRE_CASES_ENV) {
            self.require_cases = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        self
    }

    /// Set the vectors root
    #[must_use]
    pub fn with_vectors_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.vectors_root = path.into();
        self
    }

    /// Set the output root
    #[must_use]
    pub fn with_output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_root = path.into();
        self
    }

    /// Set the reserved schema file name
    #[must_use]
    pub fn with_schema_file_name(mut self, name: impl Into<String>) -> Self {
        self.schema_file_name = name.into();
        self
    }

    /// Set the document extension
    #[must_use]
    pub fn with_document_extension(mut self, extension: impl Into<String>) -> Self {
        self.document_extension = extension.into();
        self
    }

    /// Fail suites that load zero cases
    #[must_use]
    pub fn with_require_cases(mut self, require: bool) -> Self {
        self.require_cases = require;
        self
    }

    /// `<vectors_root>/<algorithm>`
    pub fn suite_dir(&self, algorithm: &str) -> PathBuf {
        self.vectors_root.join(algorithm)
    }

    /// `<output_root>/<algorithm>`
    pub fn artifact_dir(&self, algorithm: &str) -> PathBuf {
        self.output_root.join(algorithm)
    }

    /// `<output_root>/<algorithm>/<file_name>`
    pub fn artifact_path(&self, algorithm: &str, file_name: &str) -> PathBuf {
        self.artifact_dir(algorithm).join(file_name)
    }

    /// True if `path` is a vector document under this configuration
    pub fn is_vector_document(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.document_extension);
        let reserved = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == self.schema_file_name);
        extension_matches && !reserved
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::default_paths()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = HarnessConfig::default();
        assert!(config.vectors_root.ends_with("vectors"));
        assert!(config.output_root.ends_with("target/equivalence"));
        assert_eq!(config.schema_file_name, "schema.json");
        assert!(!config.require_cases);
    }

    #[test]
    fn overrides_apply_only_when_set() {
        let vars: HashMap<&str, &str> =
            [(OUTPUT_DIR_ENV, "/tmp/out"), (REQUIRE_CASES_ENV, "TRUE")].into_iter().collect();
        let config = HarnessConfig::default_paths()
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.output_root, PathBuf::from("/tmp/out"));
        assert!(config.vectors_root.ends_with("vectors"));
        assert!(config.require_cases);
    }

    #[test]
    fn schema_and_foreign_files_are_not_documents() {
        let config = HarnessConfig::default();
        assert!(config.is_vector_document(Path::new("v/nominal.json")));
        assert!(!config.is_vector_document(Path::new("v/schema.json")));
        assert!(!config.is_vector_document(Path::new("v/README.md")));
        assert!(!config.is_vector_document(Path::new("v/nominal")));
    }

    #[test]
    fn artifact_paths() {
        let config = HarnessConfig::default().with_output_root("/out");
        assert_eq!(
            config.artifact_path("pid_controller", "rust_outputs.json"),
            PathBuf::from("/out/pid_controller/rust_outputs.json")
        );
    }
}
