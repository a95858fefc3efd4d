//! Numeric values as they appear in vector documents and artifacts
//!
//! JSON has no NaN or infinity, but degenerate kernel inputs legitimately
//! produce them. [`Float`] serializes finite values as JSON numbers and
//! non-finite values as the tokens `"NaN"`, `"Infinity"` and `"-Infinity"`,
//! and accepts the same tokens when reading. That lets a golden vector pin a
//! degenerate output and lets an artifact carry one without losing it to
//! `null`.

use std::fmt;

use ctrlparity_core::constants::{NAN_TOKEN, NEG_INFINITY_TOKEN, POS_INFINITY_TOKEN};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

/// `f64` with JSON-safe handling of non-finite values
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Float(pub f64);

impl Float {
    /// Underlying value
    pub fn get(self) -> f64 {
        self.0
    }

    /// Token used for a non-finite value, `None` for finite values
    pub fn token(self) -> Option<&'static str> {
        if self.0.is_nan() {
            Some(NAN_TOKEN)
        } else if self.0 == f64::INFINITY {
            Some(POS_INFINITY_TOKEN)
        } else if self.0 == f64::NEG_INFINITY {
            Some(NEG_INFINITY_TOKEN)
        } else {
            None
        }
    }

    /// Parse a non-finite token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            NAN_TOKEN => Some(Self(f64::NAN)),
            POS_INFINITY_TOKEN => Some(Self(f64::INFINITY)),
            NEG_INFINITY_TOKEN => Some(Self(f64::NEG_INFINITY)),
            _ => None,
        }
    }
}

impl From<f64> for Float {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token() {
            Some(token) => f.write_str(token),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Float {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.token() {
            Some(token) => serializer.serialize_str(token),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Float {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FloatVisitor;

        impl<'de> Visitor<'de> for FloatVisitor {
            type Value = Float;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a number or one of \"{NAN_TOKEN}\", \"{POS_INFINITY_TOKEN}\", \"{NEG_INFINITY_TOKEN}\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Float, E> {
                Ok(Float(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Float, E> {
                Ok(Float(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Float, E> {
                Ok(Float(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Float, E> {
                Float::from_token(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(FloatVisitor)
    }
}

/// One named output: a scalar or a fixed/variable-length vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single number
    Scalar(Float),
    /// Sequence of numbers
    Vector(Vec<Float>),
}

impl FieldValue {
    /// Elements as a slice; a scalar is a one-element slice
    pub fn elements(&self) -> &[Float] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Vector(values) => values,
        }
    }

    /// True if any element is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.elements().iter().any(|v| !v.0.is_finite())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Scalar(Float(value))
    }
}

impl From<Float> for FieldValue {
    fn from(value: Float) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<Float>> for FieldValue {
    fn from(values: Vec<Float>) -> Self {
        Self::Vector(values)
    }
}

impl From<&[f64]> for FieldValue {
    fn from(values: &[f64]) -> Self {
        Self::Vector(values.iter().copied().map(Float).collect())
    }
}

/// Output field name paired with its value
#[derive(Debug, Clone, PartialEq)]
pub struct OutputField {
    /// Field name without the `actual_` prefix, e.g. `updated_state`
    pub name: String,
    /// Field value
    pub value: FieldValue,
}

impl OutputField {
    /// Build a field from anything convertible to a [`FieldValue`]
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
