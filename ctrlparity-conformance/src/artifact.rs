//! Equivalence artifacts
//!
//! One artifact per algorithm at `<output_root>/<algorithm>/rust_outputs.json`:
//!
//! ```json
//! [
//!   {
//!     "test_name": "unit_step_full_gains",
//!     "actual_output": 3.1,
//!     "actual_new_integral": 2.0,
//!     "actual_new_prev_error": 2.0,
//!     "tolerance": 1e-10
//!   }
//! ]
//! ```
//!
//! Records keep discovery order. Non-finite values use the string tokens of
//! [`Float`](crate::number::Float) and mark the record with
//! `"non_finite": true`. Writes go to a sibling temp file that is renamed over
//! the target, so readers never observe a half-written artifact.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use serde::{
    de::{self, IgnoredAny, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    config::HarnessConfig,
    errors::{ConformanceError, ConformanceResult},
    number::{FieldValue, OutputField},
};

/// Artifact file name inside each algorithm directory
pub const ARTIFACT_FILE_NAME: &str = "rust_outputs.json";

const ACTUAL_PREFIX: &str = "actual_";

/// Actual outputs of one case
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceRecord {
    /// Case name
    pub test_name: String,
    /// Kernel outputs in binding order
    pub outputs: Vec<OutputField>,
    /// Resolved absolute tolerance of the case
    pub tolerance: f64,
}

impl EquivalenceRecord {
    /// True if any output element is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.outputs.iter().any(|f| f.value.has_non_finite())
    }

    /// Look up an output by name (without the `actual_` prefix)
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.outputs.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

impl Serialize for EquivalenceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let non_finite = self.has_non_finite();
        let len = self.outputs.len() + 2 + usize::from(non_finite);

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("test_name", &self.test_name)?;
        for field in &self.outputs {
            map.serialize_entry(&format!("{ACTUAL_PREFIX}{}", field.name), &field.value)?;
        }
        map.serialize_entry("tolerance", &self.tolerance)?;
        if non_finite {
            map.serialize_entry("non_finite", &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EquivalenceRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = EquivalenceRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an equivalence record object")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<EquivalenceRecord, M::Error> {
                let mut test_name: Option<String> = None;
                let mut tolerance: Option<f64> = None;
                let mut outputs = Vec::new();

                while let Some(key) = map.next_key::<String>()? {
                    if let Some(name) = key.strip_prefix(ACTUAL_PREFIX) {
                        outputs.push(OutputField {
                            name: name.to_string(),
                            value: map.next_value()?,
                        });
                    } else if key == "test_name" {
                        test_name = Some(map.next_value()?);
                    } else if key == "tolerance" {
                        tolerance = Some(map.next_value()?);
                    } else {
                        // `non_finite` is derived from the values
                        map.next_value::<IgnoredAny>()?;
                    }
                }

                Ok(EquivalenceRecord {
                    test_name: test_name.ok_or_else(|| de::Error::missing_field("test_name"))?,
                    outputs,
                    tolerance: tolerance.ok_or_else(|| de::Error::missing_field("tolerance"))?,
                })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Write the records for `algorithm` to its artifact path, replacing any
/// previous artifact. Returns the path written.
pub fn write_artifact(
    config: &HarnessConfig,
    algorithm: &str,
    records: &[EquivalenceRecord],
) -> ConformanceResult<PathBuf> {
    let path = config.artifact_path(algorithm, ARTIFACT_FILE_NAME);
    write_records(&path, records)?;
    Ok(path)
}

/// Write records to an explicit path.
pub fn write_records(path: &Path, records: &[EquivalenceRecord]) -> ConformanceResult<()> {
    let non_finite = records.iter().filter(|r| r.has_non_finite()).count();
    if non_finite > 0 {
        warn!("{} record(s) in {} carry non-finite values", non_finite, path.display());
    }

    write_json_atomic(path, records)?;
    info!("Wrote {} equivalence record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Read an artifact back.
pub fn read_artifact(path: &Path) -> ConformanceResult<Vec<EquivalenceRecord>> {
    let text = fs::read_to_string(path).map_err(|source| ConformanceError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConformanceError::ArtifactFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` to `<path>.tmp`, then rename it over `path`.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> ConformanceResult<()> {
    let io_error = |source: io::Error| ConformanceError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| ConformanceError::ArtifactFormat {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_owned();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, &bytes).map_err(io_error)?;
    fs::rename(&tmp, path).map_err(|source| {
        // Best effort; the rename error is the one worth reporting
        let _ = fs::remove_file(&tmp);
        io_error(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::Float;

    fn pid_record() -> EquivalenceRecord {
        EquivalenceRecord {
            test_name: "unit_step_full_gains".to_string(),
            outputs: vec![
                OutputField::new("output", 3.1),
                OutputField::new("new_integral", 2.0),
                OutputField::new("new_prev_error", 2.0),
            ],
            tolerance: 1e-10,
        }
    }

    #[test]
    fn record_layout() {
        let json = serde_json::to_string(&pid_record()).unwrap();
        assert_eq!(
            json,
            r#"{"test_name":"unit_step_full_gains","actual_output":3.1,"actual_new_integral":2.0,"actual_new_prev_error":2.0,"tolerance":1e-10}"#
        );
    }

    #[test]
    fn non_finite_records_are_flagged() {
        let record = EquivalenceRecord {
            test_name: "degenerate".to_string(),
            outputs: vec![OutputField::new("updated_state", &[f64::NAN, f64::INFINITY][..])],
            tolerance: 1e-9,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["non_finite"], serde_json::Value::Bool(true));
        assert_eq!(value["actual_updated_state"][0], "NaN");
        assert_eq!(value["actual_updated_state"][1], "Infinity");
        assert!(serde_json::to_value(pid_record()).unwrap().get("non_finite").is_none());
    }

    #[test]
    fn reading_keeps_field_order_and_values() {
        let json = r#"{"test_name":"t","actual_b":[1.0,"-Infinity"],"actual_a":2,"tolerance":0.5,"non_finite":true}"#;
        let record: EquivalenceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.outputs[0].name, "b");
        assert_eq!(record.outputs[1].name, "a");
        assert_eq!(record.field("a"), Some(&FieldValue::Scalar(Float(2.0))));
        assert_eq!(record.field("b").unwrap().elements()[1].get(), f64::NEG_INFINITY);
        assert_eq!(record.tolerance, 0.5);
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the target path makes the rename fail
        let target = dir.path().join(ARTIFACT_FILE_NAME);
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = write_records(&target, &[pid_record()]).unwrap_err();
        assert!(matches!(err, ConformanceError::ArtifactIo { .. }));
        assert!(!dir.path().join(format!("{ARTIFACT_FILE_NAME}.tmp")).exists());
        assert!(target.join("keep").is_file());
    }

    #[test]
    fn missing_test_name_is_an_error() {
        let err = serde_json::from_str::<EquivalenceRecord>(r#"{"tolerance":1e-10}"#).unwrap_err();
        assert!(err.to_string().contains("test_name"));
    }
}
