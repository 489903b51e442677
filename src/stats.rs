//! Descriptive statistics with numerical stability guarantees.
//!
//! All functions in this module handle edge cases explicitly and use
//! numerically stable algorithms to avoid catastrophic cancellation.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

use crate::error::{DistributionError, Result};

/// Which denominator the spread statistic uses.
///
/// `Sample` divides the sum of squared deviations by `n − 1` (Bessel's
/// correction), `Population` divides by `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Spread {
    #[default]
    Sample,
    Population,
}

impl Spread {
    /// Smallest sample size for which the statistic is defined.
    pub fn min_len(self) -> usize {
        match self {
            Spread::Sample => 2,
            Spread::Population => 1,
        }
    }
}

/// Location and spread derived from a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub stdev: f64,
}

/// Derives mean and standard deviation from `data`.
///
/// Non-finite observations are rejected before the length check so the
/// caller learns about the bad value first.
///
/// # Errors
/// - `NonFiniteObservation` for the first NaN/±∞ value.
/// - `InsufficientData` if `data.len() < spread.min_len()`.
/// - `InvalidParameters` if the standard deviation exceeds `f64::MAX`.
///
/// # Examples
/// ```
/// use u_dist::stats::{summarize, Spread};
/// let m = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0], Spread::Population).unwrap();
/// assert!((m.mean - 3.0).abs() < 1e-15);
/// assert!((m.stdev - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn summarize(data: &[f64], spread: Spread) -> Result<Moments> {
    check_finite(data)?;
    let required = spread.min_len();
    if data.len() < required {
        return Err(DistributionError::InsufficientData {
            required,
            got: data.len(),
        });
    }

    // Power-of-two rescaling is exact and keeps squared deviations finite.
    let max_abs = data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    let scale = if max_abs > 1.0 {
        2.0_f64.powi(max_abs.log2().floor() as i32)
    } else {
        1.0
    };
    let scaled: Vec<f64> = data.iter().map(|&x| x / scale).collect();
    let stdev = match spread {
        Spread::Sample => std_dev(&scaled),
        Spread::Population => population_std_dev(&scaled),
    };

    match (mean(&scaled), stdev) {
        (Some(mean), Some(stdev)) => {
            let moments = Moments {
                mean: mean * scale,
                stdev: stdev * scale,
            };
            if !moments.mean.is_finite() || !moments.stdev.is_finite() {
                return Err(DistributionError::InvalidParameters(format!(
                    "sample moments are not representable: mean={}, stdev={}",
                    moments.mean, moments.stdev
                )));
            }
            Ok(moments)
        }
        _ => Err(DistributionError::InsufficientData {
            required,
            got: data.len(),
        }),
    }
}

/// Returns `Err` for the first non-finite value in `data`.
pub(crate) fn check_finite(data: &[f64]) -> Result<()> {
    match data.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(DistributionError::NonFiniteObservation {
            index,
            value: data[index],
        }),
        None => Ok(()),
    }
}

/// Computes the arithmetic mean using compensated summation.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_dist::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the sample variance (denominator `n − 1`).
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_dist::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.sample_variance()
}

/// Computes the population variance (denominator `n`).
///
/// # Returns
/// - `None` if `data` is empty or contains NaN/Inf.
pub fn population_variance(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    if !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut acc = WelfordAccumulator::new();
    for &x in data {
        acc.update(x);
    }
    acc.population_variance()
}

/// Sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population standard deviation, `sqrt(population_variance(data))`.
pub fn population_std_dev(data: &[f64]) -> Option<f64> {
    population_variance(data).map(f64::sqrt)
}

/// Returns the minimum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
///
/// # Examples
/// ```
/// use u_dist::stats::min;
/// assert_eq!(min(&[3.0, 1.0, 4.0, 1.0, 5.0]), Some(1.0));
/// ```
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Returns the maximum value in the slice.
///
/// # Returns
/// - `None` if `data` is empty or contains NaN.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

// ---------------------------------------------------------------------------
// Kahan compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean and variance.
///
/// # Examples
/// ```
/// use u_dist::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_variance().unwrap() - 4.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean_acc = value;
            return;
        }
        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean_acc)
        }
    }

    /// Sample variance (n − 1), or `None` below 2 samples.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            None
        } else {
            Some(self.m2 / (self.count - 1) as f64)
        }
    }

    /// Population variance (n), or `None` if empty.
    pub fn population_variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean ---

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), None);
    }

    // --- variance ---

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
        assert!((population_variance(&v).unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_variance_single() {
        assert_eq!(variance(&[1.0]), None);
        assert_eq!(population_variance(&[1.0]), Some(0.0));
    }

    #[test]
    fn test_std_dev_one_to_five() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((std_dev(&v).unwrap() - 1.5811388300841898).abs() < 1e-12);
        assert!((population_std_dev(&v).unwrap() - 1.4142135623730951).abs() < 1e-12);
    }

    // --- min / max ---

    #[test]
    fn test_min_max() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        assert_eq!(min(&v), Some(1.0));
        assert_eq!(max(&v), Some(9.0));
        assert_eq!(min(&[]), None);
        assert_eq!(max(&[1.0, f64::NAN]), None);
    }

    // --- summarize ---

    #[test]
    fn test_summarize_modes() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        let s = summarize(&v, Spread::Sample).unwrap();
        let p = summarize(&v, Spread::Population).unwrap();
        assert!((s.mean - 3.0).abs() < 1e-15);
        assert!((s.stdev - 1.5811388300841898).abs() < 1e-12);
        assert!((p.stdev - 1.4142135623730951).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_too_short() {
        assert_eq!(
            summarize(&[1.0], Spread::Sample),
            Err(DistributionError::InsufficientData {
                required: 2,
                got: 1
            })
        );
        assert_eq!(
            summarize(&[], Spread::Population),
            Err(DistributionError::InsufficientData {
                required: 1,
                got: 0
            })
        );
        assert!(summarize(&[7.0], Spread::Population).is_ok());
    }

    #[test]
    fn test_summarize_non_finite() {
        let err = summarize(&[1.0, 2.0, f64::INFINITY], Spread::Sample).unwrap_err();
        assert!(matches!(
            err,
            DistributionError::NonFiniteObservation { index: 2, .. }
        ));
    }

    #[test]
    fn test_summarize_near_overflow() {
        let m = summarize(&[1e308, -1e308, 1e308], Spread::Sample).unwrap();
        assert!((m.mean - 1e308 / 3.0).abs() < 1e294, "mean {}", m.mean);
        let expected = 2.0 / 3.0_f64.sqrt() * 1e308;
        assert!(
            ((m.stdev - expected) / expected).abs() < 1e-12,
            "stdev {} vs {expected}",
            m.stdev
        );
    }

    #[test]
    fn test_summarize_unrepresentable_stdev() {
        let err = summarize(&[1.7e308, -1.7e308], Spread::Sample).unwrap_err();
        assert!(matches!(err, DistributionError::InvalidParameters(_)));
    }

    #[test]
    fn test_summarize_matches_unscaled() {
        let v = [12.5, 7.25, 99.0, -3.0, 41.0];
        let m = summarize(&v, Spread::Sample).unwrap();
        assert_eq!(m.mean, mean(&v).unwrap());
        assert_eq!(m.stdev, std_dev(&v).unwrap());
    }

    #[test]
    fn test_spread_default_is_sample() {
        assert_eq!(Spread::default(), Spread::Sample);
    }

    // --- kahan_sum ---

    #[test]
    fn test_kahan_sum_cancellation() {
        let v = [1e16, 1.0, -1e16];
        assert_eq!(kahan_sum(&v), 1.0);
    }

    #[test]
    fn test_welford_offset_data() {
        let mut acc = WelfordAccumulator::new();
        for i in 0..5 {
            acc.update(1e9 + i as f64);
        }
        assert_eq!(acc.count(), 5);
        let var = acc.sample_variance().unwrap();
        assert!(
            (var - 2.5).abs() < 1e-6,
            "Variance of offset data should be ~2.5, got {var}"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating finite f64 vectors of reasonable size.
    fn finite_vec(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e6_f64..1e6, min_len..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn variance_non_negative(data in finite_vec(2, 100)) {
            let var = variance(&data).unwrap();
            prop_assert!(var >= 0.0, "variance must be >= 0, got {}", var);
        }

        #[test]
        fn population_below_sample(data in finite_vec(2, 100)) {
            let s = summarize(&data, Spread::Sample).unwrap();
            let p = summarize(&data, Spread::Population).unwrap();
            prop_assert!(p.stdev <= s.stdev + 1e-12);
        }

        #[test]
        fn summarize_mean_is_average(data in finite_vec(2, 100)) {
            let m = summarize(&data, Spread::Sample).unwrap().mean;
            let naive = data.iter().sum::<f64>() / data.len() as f64;
            prop_assert!((m - naive).abs() < 1e-6, "mean {} vs naive {}", m, naive);
        }
    }
}
