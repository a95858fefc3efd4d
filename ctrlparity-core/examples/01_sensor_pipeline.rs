//! Sensor Processing Pipeline Example
//!
//! Chains all three kernels the way a control loop would:
//!
//! 1. Generate a noisy sine wave (deterministic pseudo-noise)
//! 2. `low_pass_filter` smooths the raw samples
//! 3. `kalman_step` estimates position and velocity from the smoothed signal
//! 4. `pid_step` drives the estimate towards the reference
//!
//! The kernels hold no state; the loop threads the Kalman state/covariance
//! and the PID integral/previous error forward itself.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_sensor_pipeline
//! ```

use std::f64::consts::PI;

use ctrlparity_core::kernels::{
    kalman_step, low_pass_filter, pid_step, KalmanInputs, PidGains, PidState,
};

const NUM_STEPS: usize = 20;
const DT: f64 = 0.1;
const AMPLITUDE: f64 = 5.0;
const FREQUENCY_HZ: f64 = 0.5;
const NOISE_AMPLITUDE: f64 = 1.5;

/// Hash-style pseudo-noise in [-1, 1], reproducible across runs
fn pseudo_noise(step: usize) -> f64 {
    let x = (step as f64 * 12.9898 + 78.233).sin() * 43758.5453;
    (x - x.floor()) * 2.0 - 1.0
}

fn main() {
    println!("ctrlparity Sensor Pipeline Example");
    println!("==================================\n");

    let reference: Vec<f64> = (0..NUM_STEPS)
        .map(|i| AMPLITUDE * (2.0 * PI * FREQUENCY_HZ * i as f64 * DT).sin())
        .collect();
    let raw: Vec<f64> = reference
        .iter()
        .enumerate()
        .map(|(i, r)| r + NOISE_AMPLITUDE * pseudo_noise(i))
        .collect();

    // Step 1: smooth the whole raw signal
    let mut filtered = vec![0.0; NUM_STEPS];
    low_pass_filter(&raw, 0.3, &mut filtered);

    // Steps 2 and 3 run per tick
    let mut kf = KalmanInputs {
        state: [0.0, 0.0],
        measurement: 0.0,
        state_covariance: [10.0, 0.0, 0.0, 10.0],
        measurement_noise: 2.0,
        process_noise: 0.1,
    };
    let gains = PidGains::new(1.0, 0.1, 0.05);
    let mut pid = PidState::default();

    println!("{:<5}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}", "Step", "Raw", "Filtered", "KF Est", "Ref", "Control");
    println!("-----  --------  --------  --------  --------  --------");

    for i in 0..NUM_STEPS {
        kf.measurement = filtered[i];
        let update = kalman_step(&kf);

        let error = reference[i] - update.state[0];
        let control = pid_step(error, pid, &gains, DT);

        println!(
            "{:<5}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}",
            i, raw[i], filtered[i], update.state[0], reference[i], control.output
        );

        kf.state = update.state;
        kf.state_covariance = update.covariance;
        pid = control.next_state();
    }

    println!("\nFinal covariance: {:?}", kf.state_covariance);
}
