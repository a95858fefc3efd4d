//! Property tests for the kernel invariants
//!
//! - Joseph-form covariance stays symmetric for symmetric priors with S ≠ 0
//! - Low-pass output starts at the first input and alpha = 1 is the identity
//! - PID carries the error through unchanged and integrates with one multiply-add

use ctrlparity_core::kernels::{
    kalman_step, low_pass_filter, pid_step, KalmanInputs, PidGains, PidState,
};
use proptest::prelude::*;

/// Symmetric positive-definite 2×2 covariance, flattened row-major
fn covariance() -> impl Strategy<Value = [f64; 4]> {
    (0.01f64..100.0, 0.01f64..100.0, -0.99f64..0.99).prop_map(|(p11, p22, rho)| {
        let c = rho * (p11 * p22).sqrt();
        [p11, c, c, p22]
    })
}

proptest! {
    #[test]
    fn joseph_update_is_symmetric(
        position in -100.0f64..100.0,
        velocity in -10.0f64..10.0,
        measurement in -100.0f64..100.0,
        cov in covariance(),
        r in 0.01f64..100.0,
        q in 0.0f64..10.0,
    ) {
        let update = kalman_step(&KalmanInputs {
            state: [position, velocity],
            measurement,
            state_covariance: cov,
            measurement_noise: r,
            process_noise: q,
        });

        let scale = update.covariance.iter().fold(1.0f64, |m, v| m.max(v.abs()));
        prop_assert!((update.covariance[1] - update.covariance[2]).abs() <= 1e-12 * scale);
        prop_assert!(update.covariance[0] >= 0.0);
        prop_assert!(update.covariance[3] >= 0.0);
        prop_assert!(update.state.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn low_pass_first_sample_is_exact(
        input in prop::collection::vec(-1e6f64..1e6, 1..64),
        alpha in 0.0f64..=1.0,
    ) {
        let mut output = vec![0.0; input.len()];
        low_pass_filter(&input, alpha, &mut output);
        prop_assert_eq!(output[0], input[0]);
    }

    #[test]
    fn low_pass_unity_alpha_is_identity(input in prop::collection::vec(-1e6f64..1e6, 0..64)) {
        let mut output = vec![0.0; input.len()];
        low_pass_filter(&input, 1.0, &mut output);
        prop_assert_eq!(output, input);
    }

    #[test]
    fn low_pass_stays_within_input_range(
        input in prop::collection::vec(-1e3f64..1e3, 1..64),
        alpha in 0.0f64..=1.0,
    ) {
        let mut output = vec![0.0; input.len()];
        low_pass_filter(&input, alpha, &mut output);

        let lo = input.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = input.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for y in output {
            prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9);
        }
    }

    #[test]
    fn pid_carries_error_and_integrates(
        error in -1e3f64..1e3,
        integral in -1e3f64..1e3,
        prev_error in -1e3f64..1e3,
        kp in 0.0f64..10.0,
        ki in 0.0f64..10.0,
        kd in 0.0f64..10.0,
        dt in 1e-4f64..1.0,
    ) {
        let step = pid_step(error, PidState { integral, prev_error }, &PidGains::new(kp, ki, kd), dt);

        prop_assert_eq!(step.new_prev_error, error);
        prop_assert_eq!(step.new_integral, integral + error * dt);
        prop_assert!(step.output.is_finite());
    }
}

#[test]
fn low_pass_empty_input_touches_nothing() {
    let mut output: [f64; 0] = [];
    low_pass_filter(&[], 0.5, &mut output);

    let mut sentinel = [f64::NAN; 3];
    low_pass_filter(&[], 0.5, &mut sentinel);
    assert!(sentinel.iter().all(|v| v.is_nan()));
}
