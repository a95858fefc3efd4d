//! Bindings between vector documents and kernels
//!
//! Each kernel gets a zero-sized type implementing [`Algorithm`]. The binding
//! owns the document field names for its kernel, turns loosely typed inputs
//! (JSON arrays) into a fixed-arity invocation, and names the outputs so the
//! runner and the exporter can treat all kernels alike.
//!
//! | Binding           | Vector directory   | Outputs                                      |
//! |-------------------|--------------------|----------------------------------------------|
//! | [`KalmanFilter`]  | `kalman_filter`    | `updated_state`, `updated_covariance`        |
//! | [`LowPassFilter`] | `low_pass_filter`  | `output_signal`                              |
//! | [`PidController`] | `pid_controller`   | `output`, `new_integral`, `new_prev_error`   |

use std::fmt::Debug;

use ctrlparity_core::{
    constants::{KALMAN_COVARIANCE_LEN, KALMAN_STATE_LEN},
    kernels::{kalman_step, low_pass_filtered, pid_step, to_fixed, KalmanInputs, PidGains, PidState},
    InvocationResult,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::number::{Float, OutputField};

/// A kernel under conformance test
pub trait Algorithm {
    /// Vector directory and artifact directory name
    const NAME: &'static str;

    /// `inputs` object of a case
    type Inputs: DeserializeOwned;

    /// `expected_output` object of a case
    type Expected: DeserializeOwned;

    /// Arity-checked kernel arguments
    type Invocation: Clone + Debug;

    /// Validate document inputs against the kernel's fixed arity.
    fn prepare(inputs: Self::Inputs) -> InvocationResult<Self::Invocation>;

    /// Run the kernel once and name its outputs.
    fn execute(invocation: &Self::Invocation) -> Vec<OutputField>;

    /// Name the golden outputs, in the same order as [`Algorithm::execute`].
    fn expected_fields(expected: Self::Expected) -> Vec<OutputField>;
}

// ============================================================================
// Kalman filter
// ============================================================================

/// Binding for [`kalman_step`]
#[derive(Debug, Clone, Copy)]
pub struct KalmanFilter;

/// Kalman `inputs` object
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KalmanDocumentInputs {
    /// `[position, velocity]`
    pub state: Vec<f64>,
    /// Position measurement
    pub measurement: f64,
    /// Row-major `[P11, P12, P21, P22]`
    pub state_covariance: Vec<f64>,
    /// R
    pub measurement_noise: f64,
    /// Q
    pub process_noise: f64,
}

/// Kalman `expected_output` object
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KalmanExpected {
    /// Posterior state
    pub updated_state: Vec<Float>,
    /// Posterior covariance, row-major
    pub updated_covariance: Vec<Float>,
}

impl Algorithm for KalmanFilter {
    const NAME: &'static str = "kalman_filter";
    type Inputs = KalmanDocumentInputs;
    type Expected = KalmanExpected;
    type Invocation = KalmanInputs;

    fn prepare(inputs: KalmanDocumentInputs) -> InvocationResult<KalmanInputs> {
        Ok(KalmanInputs {
            state: to_fixed::<KALMAN_STATE_LEN>("state", &inputs.state)?,
            measurement: inputs.measurement,
            state_covariance: to_fixed::<KALMAN_COVARIANCE_LEN>("state_covariance", &inputs.state_covariance)?,
            measurement_noise: inputs.measurement_noise,
            process_noise: inputs.process_noise,
        })
    }

    fn execute(invocation: &KalmanInputs) -> Vec<OutputField> {
        let update = kalman_step(invocation);
        vec![
            OutputField::new("updated_state", &update.state[..]),
            OutputField::new("updated_covariance", &update.covariance[..]),
        ]
    }

    fn expected_fields(expected: KalmanExpected) -> Vec<OutputField> {
        vec![
            OutputField::new("updated_state", expected.updated_state),
            OutputField::new("updated_covariance", expected.updated_covariance),
        ]
    }
}

// ============================================================================
// Low-pass filter
// ============================================================================

/// Binding for [`low_pass_filter`](ctrlparity_core::kernels::low_pass_filter)
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter;

/// Low-pass `inputs` object
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LowPassInputs {
    /// Raw samples
    pub input_signal: Vec<f64>,
    /// Smoothing factor
    pub alpha: f64,
}

/// Low-pass `expected_output` object
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LowPassExpected {
    /// Filtered samples
    pub output_signal: Vec<Float>,
}

impl Algorithm for LowPassFilter {
    const NAME: &'static str = "low_pass_filter";
    type Inputs = LowPassInputs;
    type Expected = LowPassExpected;
    type Invocation = LowPassInputs;

    fn prepare(inputs: LowPassInputs) -> InvocationResult<LowPassInputs> {
        // Any length is valid, including zero
        Ok(inputs)
    }

    fn execute(invocation: &LowPassInputs) -> Vec<OutputField> {
        let output = low_pass_filtered(&invocation.input_signal, invocation.alpha);
        vec![OutputField::new("output_signal", &output[..])]
    }

    fn expected_fields(expected: LowPassExpected) -> Vec<OutputField> {
        vec![OutputField::new("output_signal", expected.output_signal)]
    }
}

// ============================================================================
// PID controller
// ============================================================================

/// Binding for [`pid_step`]
#[derive(Debug, Clone, Copy)]
pub struct PidController;

/// PID `inputs` object
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidInputs {
    /// Current error
    pub error: f64,
    /// Accumulated integral
    pub integral: f64,
    /// Error at the previous step
    pub prev_error: f64,
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Time step
    pub dt: f64,
}

/// PID `expected_output` object
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidExpected {
    /// Control output
    pub output: Float,
    /// Integral after this step
    pub new_integral: Float,
    /// Error to carry into the next step
    pub new_prev_error: Float,
}

/// Arguments for one [`pid_step`] call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidInvocation {
    /// Current error
    pub error: f64,
    /// Carried state
    pub state: PidState,
    /// Gains
    pub gains: PidGains,
    /// Time step
    pub dt: f64,
}

impl Algorithm for PidController {
    const NAME: &'static str = "pid_controller";
    type Inputs = PidInputs;
    type Expected = PidExpected;
    type Invocation = PidInvocation;

    fn prepare(inputs: PidInputs) -> InvocationResult<PidInvocation> {
        Ok(PidInvocation {
            error: inputs.error,
            state: PidState {
                integral: inputs.integral,
                prev_error: inputs.prev_error,
            },
            gains: PidGains::new(inputs.kp, inputs.ki, inputs.kd),
            dt: inputs.dt,
        })
    }

    fn execute(invocation: &PidInvocation) -> Vec<OutputField> {
        let out = pid_step(invocation.error, invocation.state, &invocation.gains, invocation.dt);
        vec![
            OutputField::new("output", out.output),
            OutputField::new("new_integral", out.new_integral),
            OutputField::new("new_prev_error", out.new_prev_error),
        ]
    }

    fn expected_fields(expected: PidExpected) -> Vec<OutputField> {
        vec![
            OutputField::new("output", expected.output),
            OutputField::new("new_integral", expected.new_integral),
            OutputField::new("new_prev_error", expected.new_prev_error),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::FieldValue;
    use ctrlparity_core::InvocationError;

    #[test]
    fn kalman_prepare_checks_arity() {
        let inputs = KalmanDocumentInputs {
            state: vec![0.0, 0.0, 0.0],
            measurement: 1.0,
            state_covariance: vec![10.0, 0.0, 0.0, 10.0],
            measurement_noise: 2.0,
            process_noise: 0.1,
        };
        assert_eq!(
            KalmanFilter::prepare(inputs).unwrap_err(),
            InvocationError::ArityMismatch { field: "state", expected: 2, actual: 3 }
        );
    }

    #[test]
    fn kalman_unknown_input_key_is_rejected() {
        let json = r#"{"state":[0,0],"measurement":1,"state_covariance":[1,0,0,1],
                       "measurement_noise":1,"process_noise":0,"control":3}"#;
        assert!(serde_json::from_str::<KalmanDocumentInputs>(json).is_err());
    }

    #[test]
    fn pid_execute_names_outputs() {
        let invocation = PidController::prepare(PidInputs {
            error: 2.0,
            integral: 1.8,
            prev_error: 1.5,
            kp: 1.0,
            ki: 0.5,
            kd: 0.1,
            dt: 0.1,
        })
        .unwrap();

        let fields = PidController::execute(&invocation);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["output", "new_integral", "new_prev_error"]);
        assert_eq!(fields[2].value, FieldValue::from(2.0));
    }

    #[test]
    fn low_pass_accepts_empty_signal() {
        let invocation = LowPassFilter::prepare(LowPassInputs { input_signal: vec![], alpha: 0.5 }).unwrap();
        let fields = LowPassFilter::execute(&invocation);
        assert_eq!(fields[0].value, FieldValue::Vector(vec![]));
    }

    #[test]
    fn expected_fields_match_execute_order() {
        let expected: KalmanExpected =
            serde_json::from_str(r#"{"updated_state":[1,"NaN"],"updated_covariance":[1,2,3,4]}"#).unwrap();
        let fields = KalmanFilter::expected_fields(expected);
        assert_eq!(fields[0].name, "updated_state");
        assert!(fields[0].value.has_non_finite());
        assert_eq!(fields[1].value.elements().len(), 4);
    }
}
