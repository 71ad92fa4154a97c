//! # Descriptive statistics
//!
//! Several feature sets describe a variable or an instance by the distribution of some quantity,
//! like the degrees of the rows a variable appears in. The statistics of an empty collection are
//! undefined and take the value `NaN`, except for the count and the sum.
use num_traits::Float;

/// Summary of a collection of values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary<F> {
    /// Number of values.
    pub count: usize,
    /// Zero when empty.
    pub sum: F,
    /// Arithmetic mean.
    pub mean: F,
    /// Population standard deviation.
    pub stddev: F,
    /// Smallest value.
    pub min: F,
    /// Largest value.
    pub max: F,
}

impl<F: Float> Summary<F> {
    /// Summarize `values`.
    ///
    /// A `NaN` amongst the values propagates to all statistics but the count.
    pub fn of(values: impl IntoIterator<Item = F>) -> Self {
        let values = values.into_iter().collect::<Vec<_>>();
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                sum: F::zero(),
                mean: F::nan(),
                stddev: F::nan(),
                min: F::nan(),
                max: F::nan(),
            };
        }

        let n = F::from(count).unwrap_or_else(F::nan);
        let sum = values.iter().fold(F::zero(), |total, &value| total + value);
        let mean = sum / n;
        let variance = values.iter()
            .map(|&value| (value - mean) * (value - mean))
            .fold(F::zero(), |total, value| total + value) / n;
        let (min, max) = values.iter().fold(
            (F::infinity(), F::neg_infinity()),
            // `Float::min` ignores `NaN`, comparisons don't
            |(min, max), &value| {
                if value.is_nan() || min.is_nan() {
                    (F::nan(), F::nan())
                } else {
                    (if value < min { value } else { min }, if value > max { value } else { max })
                }
            },
        );

        Self { count, sum, mean, stddev: variance.sqrt(), min, max }
    }
}

/// Quantile of sorted values, interpolating linearly between the two nearest values.
///
/// # Arguments
///
/// * `sorted`: Values in non-decreasing order.
/// * `q`: Fraction in `[0, 1]`.
///
/// # Return value
///
/// `NaN` if there are no values.
pub fn quantile<F: Float>(sorted: &[F], q: F) -> F {
    debug_assert!(q >= F::zero() && q <= F::one());
    debug_assert!(sorted.windows(2).all(|pair| !(pair[1] < pair[0])));

    if sorted.is_empty() {
        return F::nan();
    }

    let last = F::from(sorted.len() - 1).unwrap_or_else(F::nan);
    let position = q * last;
    let lower = position.floor();
    let (Some(i), Some(j)) = (lower.to_usize(), position.ceil().to_usize()) else {
        return F::nan();
    };

    sorted[i] + (sorted[j] - sorted[i]) * (position - lower)
}
