//! Shared helpers for the conformance integration tests
//!
//! Each test builds its own vector tree inside a temporary directory so the
//! loader can be exercised against arbitrary layouts without touching the
//! shipped vectors.

#![allow(dead_code)]

use std::{fs, path::Path};

use ctrlparity_conformance::HarnessConfig;
use tempfile::TempDir;

/// Temporary vector and output roots
pub struct Workspace {
    pub dir: TempDir,
    pub config: HarnessConfig,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = HarnessConfig::default_paths()
            .with_vectors_root(dir.path().join("vectors"))
            .with_output_root(dir.path().join("out"));
        Self { dir, config }
    }

    /// Create `<vectors>/<algorithm>/` and return it
    pub fn suite_dir(&self, algorithm: &str) -> std::path::PathBuf {
        let path = self.config.suite_dir(algorithm);
        fs::create_dir_all(&path).expect("create suite dir");
        path
    }

    /// Write `<vectors>/<algorithm>/<file>`
    pub fn write_vector(&self, algorithm: &str, file: &str, contents: &str) {
        let path = self.suite_dir(algorithm).join(file);
        fs::write(path, contents).expect("write vector");
    }
}

/// Shipped vectors directory of this crate
pub fn shipped_vectors() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/vectors"))
}

/// One proportional-only PID case as JSON; the kernel output equals `error`
pub fn pid_case(name: &str, error: f64, expected_output: f64) -> String {
    let new_integral = 0.0 + error * 0.1;
    format!(
        r#"{{"name": "{name}",
            "inputs": {{"error": {error:?}, "integral": 0.0, "prev_error": {error:?},
                        "kp": 1.0, "ki": 0.0, "kd": 0.0, "dt": 0.1}},
            "expected_output": {{"output": {expected_output:?}, "new_integral": {new_integral:?},
                                 "new_prev_error": {error:?}}}}}"#
    )
}

/// Wrap cases in a suite document
pub fn suite(cases: &[String]) -> String {
    format!(r#"{{"algorithm": "pid_controller", "version": "1.0.0", "test_cases": [{}]}}"#, cases.join(","))
}
