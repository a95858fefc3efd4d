//! First-order exponential low-pass filter
//!
//! ```text
//! y[0] = x[0]
//! y[k] = α·x[k] + (1 − α)·y[k−1]      k ≥ 1
//! ```
//!
//! Each output depends on the previous output, so the pass is strictly
//! sequential. `α` is conceptually in `(0, 1]` but is not validated: `α = 1`
//! copies the input and `α = 0` holds the first sample.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::{vec, vec::Vec};

/// Filter `input` into `output` in a single ordered pass.
///
/// Processes `min(input.len(), output.len())` samples; anything beyond that in
/// `output` is left untouched. An empty input is a no-op.
pub fn low_pass_filter(input: &[f64], alpha: f64, output: &mut [f64]) {
    let n = input.len().min(output.len());
    if n == 0 {
        return;
    }

    output[0] = input[0];
    for k in 1..n {
        output[k] = alpha * input[k] + (1.0 - alpha) * output[k - 1];
    }
}

/// Allocating wrapper around [`low_pass_filter`].
#[cfg(feature = "alloc")]
pub fn low_pass_filtered(input: &[f64], alpha: f64) -> Vec<f64> {
    let mut output = vec![0.0; input.len()];
    low_pass_filter(input, alpha, &mut output);
    output
}
