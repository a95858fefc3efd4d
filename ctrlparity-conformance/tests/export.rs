//! Conformance run with artifact export to the configured output root
//!
//! Uses `HarnessConfig::from_env()`, so by default the shipped vectors are run
//! and `target/equivalence/<algorithm>/rust_outputs.json` is left behind for
//! the external comparator. `CTRLPARITY_VECTORS_DIR`, `CTRLPARITY_OUTPUT_DIR`
//! and `CTRLPARITY_REQUIRE_CASES` redirect the run.
//!
//! The artifact is written before the verdict is asserted, so a failing run
//! still exports what the kernels produced.

use ctrlparity_conformance::{
    artifact::read_artifact, run_suite, write_artifact, Algorithm, HarnessConfig, KalmanFilter, LowPassFilter,
    PidController, ARTIFACT_FILE_NAME,
};

fn run_and_export<A: Algorithm>() {
    let config = HarnessConfig::from_env();
    let run = run_suite::<A>(&config).expect("vector directory exists");

    let path = write_artifact(&config, A::NAME, &run.records).expect("artifact written");
    assert_eq!(path, config.output_root.join(A::NAME).join(ARTIFACT_FILE_NAME));
    assert_eq!(read_artifact(&path).unwrap().len(), run.records.len());

    assert!(run.report.all_passed(), "{}", run.report);
}

#[test]
fn kalman_filter_conformance_export() {
    run_and_export::<KalmanFilter>();
}

#[test]
fn low_pass_filter_conformance_export() {
    run_and_export::<LowPassFilter>();
}

#[test]
fn pid_controller_conformance_export() {
    run_and_export::<PidController>();
}
