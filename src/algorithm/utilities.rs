//! # Utilities
//!
//! Tolerance aware comparisons and arithmetic producing the `NaN` sentinel.
use crate::data::linear_algebra::{EPSILON, FEASIBILITY_TOLERANCE};

/// Minimum gain used in the product score, such that a zero gain in one direction doesn't hide the
/// gain in the other.
const MINIMUM_GAIN: f64 = 1e-6;

/// Whether two values are equal up to a relative tolerance.
pub fn is_equal(left: f64, right: f64) -> bool {
    (left - right).abs() <= EPSILON * left.abs().max(right.abs()).max(1f64)
}

/// Distance to the next integer below, zero if `value` is integral up to the feasibility tolerance.
pub fn fractional_part(value: f64) -> f64 {
    let fractional = value - value.floor();
    if fractional < FEASIBILITY_TOLERANCE || fractional > 1f64 - FEASIBILITY_TOLERANCE {
        0f64
    } else {
        fractional
    }
}

/// Division that is undefined (`NaN`) when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0f64 { f64::NAN } else { numerator / denominator }
}

/// Encode a flag as a feature value.
pub fn indicator(flag: bool) -> f64 {
    if flag { 1f64 } else { 0f64 }
}

/// Euclidean norm of a sequence of values.
pub fn euclidean_norm(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().map(|value| value * value).sum::<f64>().sqrt()
}

/// Value to divide by for normalization, one when `norm` is zero.
pub fn nonzero_or_one(norm: f64) -> f64 {
    if norm > 0f64 { norm } else { 1f64 }
}

/// Combine the objective gains of the two children of a branching.
///
/// Prefers branchings that improve the bound in both directions. An undefined gain gives an
/// undefined score.
pub fn product_score(down_gain: f64, up_gain: f64) -> f64 {
    // written out because `f64::max` would swallow a `NaN`
    let clamp = |gain: f64| if gain < MINIMUM_GAIN { MINIMUM_GAIN } else { gain };

    clamp(down_gain) * clamp(up_gain)
}
