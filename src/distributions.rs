//! Fitted probability distributions.
//!
//! Each family keeps the ordered sample it was fitted to together with the
//! parameters derived from it, evaluates its density, and combines with
//! another instance of the same family into the distribution of the sum
//! of two independent variables.
//!
//! # Supported Families
//!
//! | Family | Parameters | Mean | Std Dev | Combine |
//! |---|---|---|---|---|
//! | [`Gaussian`] | μ, σ | μ | σ | μ₁+μ₂, √(σ₁²+σ₂²) |
//! | [`Binomial`] | p, n | n·p | √(n·p·(1−p)) | p, n₁+n₂ (equal p only) |
//!
//! The shared contract is the [`Univariate`] trait. [`Distribution`] is a
//! tagged enum over the families that implements the same contract and
//! dispatches by family, so mixing families is caught at runtime with
//! [`DistributionError::FamilyMismatch`].
//!
//! # Lifecycle
//!
//! An instance starts uninitialized (`new()`/`default()`) and becomes ready
//! either through `with_params` or through `load`. Parameter reads on an
//! uninitialized instance fail with [`DistributionError::NotInitialized`].

use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{DistributionError, Result};
use crate::random;
use crate::special;
use crate::stats::{self, Moments, Spread};

/// Concrete distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    Gaussian,
    Binomial,
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyKind::Gaussian => f.write_str("Gaussian"),
            FamilyKind::Binomial => f.write_str("Binomial"),
        }
    }
}

/// Contract shared by every distribution family.
pub trait Univariate: Sized {
    /// The family this instance belongs to.
    fn family(&self) -> FamilyKind;

    /// Replaces the stored sample and re-derives the parameters.
    ///
    /// On error the instance is left exactly as it was.
    fn load_with(&mut self, observations: &[f64], spread: Spread) -> Result<()>;

    /// [`load_with`](Univariate::load_with) using [`Spread::Sample`].
    fn load(&mut self, observations: &[f64]) -> Result<()> {
        self.load_with(observations, Spread::default())
    }

    /// The sample the parameters were derived from. Empty when the
    /// instance was built from explicit parameters or by `combine`.
    fn data(&self) -> &[f64];

    fn mean(&self) -> Result<f64>;

    fn stdev(&self) -> Result<f64>;

    /// Evaluates the family's density (or mass) function at `x`.
    fn density(&self, x: f64) -> Result<f64>;

    /// Distribution of the sum of two independent variables of this family.
    /// Neither operand is modified.
    fn combine(&self, other: &Self) -> Result<Self>;

    /// One-line, locale-independent summary.
    fn describe(&self) -> String;

    /// Left edges of `n_buckets` equal-width intervals over
    /// `[min(data), max(data))` and the density at each edge.
    ///
    /// # Errors
    /// - `InvalidParameters` if `n_buckets == 0`.
    /// - `NotInitialized` if no sample is stored.
    fn histogram_points(&self, n_buckets: usize) -> Result<(Vec<f64>, Vec<f64>)> {
        histogram_points(self.data(), n_buckets, |x| self.density(x))
    }
}

fn histogram_points<F>(data: &[f64], n_buckets: usize, density: F) -> Result<(Vec<f64>, Vec<f64>)>
where
    F: Fn(f64) -> Result<f64>,
{
    if n_buckets == 0 {
        return Err(DistributionError::InvalidParameters(
            "histogram needs at least one bucket".into(),
        ));
    }
    let (lo, hi) = match (stats::min(data), stats::max(data)) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Err(DistributionError::NotInitialized),
    };
    let interval = (hi - lo) / n_buckets as f64;
    trace!(n_buckets, lo, hi, interval, "computing histogram points");

    let points = (0..n_buckets)
        .map(|i| {
            let x = lo + interval * i as f64;
            density(x).map(|y| (x, y))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(points.into_iter().unzip())
}

// ============================================================================
// Gaussian
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²) fitted to a sample.
///
/// # Mathematical Definition
/// - PDF: φ(x) = (1/(σ√(2π))) exp(−(x−μ)²/(2σ²))
/// - Sum of independent N(μ₁, σ₁²) and N(μ₂, σ₂²): N(μ₁+μ₂, σ₁²+σ₂²)
///
/// # Examples
/// ```
/// use u_dist::distributions::{Gaussian, Univariate};
///
/// let mut g = Gaussian::new();
/// g.load(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert!((g.mean().unwrap() - 3.0).abs() < 1e-15);
/// assert!((g.stdev().unwrap() - 1.5811388300841898).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gaussian {
    data: Vec<f64>,
    params: Option<Moments>,
}

impl Gaussian {
    /// Creates an uninitialized instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ready instance from explicit μ and σ.
    ///
    /// A zero σ is accepted (a degenerate instance can still be described
    /// and combined) but [`density`](Univariate::density) refuses it.
    ///
    /// # Errors
    /// Returns `InvalidParameters` if either value is not finite or σ < 0.
    pub fn with_params(mean: f64, stdev: f64) -> Result<Self> {
        if !mean.is_finite() || !stdev.is_finite() || stdev < 0.0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Gaussian requires finite μ and σ ≥ 0, got μ={mean}, σ={stdev}"
            )));
        }
        Ok(Self {
            data: Vec::new(),
            params: Some(Moments { mean, stdev }),
        })
    }

    /// Fits a new instance to `observations` using the sample spread.
    pub fn from_sample(observations: &[f64]) -> Result<Self> {
        let mut g = Self::new();
        g.load(observations)?;
        Ok(g)
    }

    pub fn variance(&self) -> Result<f64> {
        self.stdev().map(|s| s * s)
    }

    /// Draws `count` variates from N(μ, σ²).
    pub fn sample_n<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<f64>> {
        let Moments { mean, stdev } = self.params.ok_or(DistributionError::NotInitialized)?;
        Ok((0..count)
            .map(|_| mean + stdev * random::standard_normal(rng))
            .collect())
    }
}

impl Univariate for Gaussian {
    fn family(&self) -> FamilyKind {
        FamilyKind::Gaussian
    }

    fn load_with(&mut self, observations: &[f64], spread: Spread) -> Result<()> {
        let moments = stats::summarize(observations, spread)?;
        debug!(
            family = %FamilyKind::Gaussian,
            n = observations.len(),
            ?spread,
            mean = moments.mean,
            stdev = moments.stdev,
            "loaded sample"
        );
        self.data = observations.to_vec();
        self.params = Some(moments);
        Ok(())
    }

    fn data(&self) -> &[f64] {
        &self.data
    }

    fn mean(&self) -> Result<f64> {
        self.params
            .map(|m| m.mean)
            .ok_or(DistributionError::NotInitialized)
    }

    fn stdev(&self) -> Result<f64> {
        self.params
            .map(|m| m.stdev)
            .ok_or(DistributionError::NotInitialized)
    }

    /// PDF: (1/(σ√(2π))) exp(−(x−μ)²/(2σ²)).
    ///
    /// # Errors
    /// `NotInitialized` if σ is zero or no parameters exist.
    fn density(&self, x: f64) -> Result<f64> {
        let Moments { mean, stdev } = self
            .params
            .filter(|m| m.stdev > 0.0)
            .ok_or(DistributionError::NotInitialized)?;
        let z = (x - mean) / stdev;
        Ok(special::standard_normal_pdf(z) / stdev)
    }

    fn combine(&self, other: &Self) -> Result<Self> {
        let a = self.params.ok_or(DistributionError::NotInitialized)?;
        let b = other.params.ok_or(DistributionError::NotInitialized)?;
        let combined = Moments {
            mean: a.mean + b.mean,
            stdev: a.stdev.hypot(b.stdev),
        };
        if !combined.mean.is_finite() || !combined.stdev.is_finite() {
            return Err(DistributionError::InvalidParameters(format!(
                "combined Gaussian is not representable: μ={}, σ={}",
                combined.mean, combined.stdev
            )));
        }
        debug!(
            family = %FamilyKind::Gaussian,
            mean = combined.mean,
            stdev = combined.stdev,
            "combined distributions"
        );
        Ok(Self {
            data: Vec::new(),
            params: Some(combined),
        })
    }

    fn describe(&self) -> String {
        match self.params {
            Some(Moments { mean, stdev }) => {
                format!("mean {mean}, standard deviation {stdev}")
            }
            None => "uninitialized".to_string(),
        }
    }
}

impl fmt::Display for Gaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Binomial
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct BinomialParams {
    p: f64,
    n: u64,
}

/// Binomial distribution B(n, p) fitted to a sample of 0/1 outcomes.
///
/// # Mathematical Definition
/// - PMF: C(n,k) pᵏ (1−p)ⁿ⁻ᵏ for integer k ∈ [0, n]
/// - Mean: n·p
/// - Std Dev: √(n·p·(1−p))
/// - Sum of independent B(n₁, p) and B(n₂, p): B(n₁+n₂, p)
///
/// Loading a sample sets `p` to the fraction of ones and `n` to the
/// number of trials. The moments are analytical, so the [`Spread`]
/// selector is ignored.
///
/// # Examples
/// ```
/// use u_dist::distributions::{Binomial, Univariate};
///
/// let b = Binomial::with_params(0.4, 20).unwrap();
/// assert!((b.mean().unwrap() - 8.0).abs() < 1e-12);
/// assert!((b.density(5.0).unwrap() - 0.0746).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binomial {
    data: Vec<f64>,
    params: Option<BinomialParams>,
}

impl Binomial {
    /// Creates an uninitialized instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ready instance with success probability `p` over `n` trials.
    ///
    /// # Errors
    /// Returns `InvalidParameters` if `p ∉ [0, 1]` or `n == 0`.
    pub fn with_params(p: f64, n: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) || n == 0 {
            return Err(DistributionError::InvalidParameters(format!(
                "Binomial requires p ∈ [0, 1] and n ≥ 1, got p={p}, n={n}"
            )));
        }
        Ok(Self {
            data: Vec::new(),
            params: Some(BinomialParams { p, n }),
        })
    }

    /// Fits a new instance to a sample of 0/1 outcomes.
    pub fn from_sample(observations: &[f64]) -> Result<Self> {
        let mut b = Self::new();
        b.load(observations)?;
        Ok(b)
    }

    pub fn p(&self) -> Result<f64> {
        self.params
            .map(|b| b.p)
            .ok_or(DistributionError::NotInitialized)
    }

    pub fn n(&self) -> Result<u64> {
        self.params
            .map(|b| b.n)
            .ok_or(DistributionError::NotInitialized)
    }

    /// Probability mass at `k` successes. Zero for `k > n`.
    pub fn pmf(&self, k: u64) -> Result<f64> {
        let BinomialParams { p, n } = self.params.ok_or(DistributionError::NotInitialized)?;
        if k > n {
            return Ok(0.0);
        }
        // ln(0) would poison the sum at the boundaries
        if p == 0.0 {
            return Ok(if k == 0 { 1.0 } else { 0.0 });
        }
        if p == 1.0 {
            return Ok(if k == n { 1.0 } else { 0.0 });
        }
        let kf = k as f64;
        let nf = n as f64;
        Ok((special::ln_choose(n, k) + kf * p.ln() + (nf - kf) * (1.0 - p).ln()).exp())
    }

    /// Every outcome `0..=n` with its probability, for bar charts.
    pub fn pmf_points(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let n = self.n()?;
        let points = (0..=n)
            .map(|k| self.pmf(k).map(|y| (k as f64, y)))
            .collect::<Result<Vec<_>>>()?;
        Ok(points.into_iter().unzip())
    }

    /// Draws `count` success counts from B(n, p).
    pub fn sample_n<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<f64>> {
        let BinomialParams { p, n } = self.params.ok_or(DistributionError::NotInitialized)?;
        Ok((0..count)
            .map(|_| random::bernoulli_count(n, p, rng) as f64)
            .collect())
    }
}

impl Univariate for Binomial {
    fn family(&self) -> FamilyKind {
        FamilyKind::Binomial
    }

    fn load_with(&mut self, observations: &[f64], _spread: Spread) -> Result<()> {
        stats::check_finite(observations)?;
        if let Some(index) = observations.iter().position(|&x| x != 0.0 && x != 1.0) {
            return Err(DistributionError::InvalidParameters(format!(
                "Binomial observations must be 0 or 1, got {} at index {index}",
                observations[index]
            )));
        }
        let p = stats::mean(observations).ok_or(DistributionError::InsufficientData {
            required: 1,
            got: 0,
        })?;
        let n = observations.len() as u64;
        debug!(family = %FamilyKind::Binomial, n, p, "loaded sample");
        self.data = observations.to_vec();
        self.params = Some(BinomialParams { p, n });
        Ok(())
    }

    fn data(&self) -> &[f64] {
        &self.data
    }

    fn mean(&self) -> Result<f64> {
        self.params
            .map(|b| b.n as f64 * b.p)
            .ok_or(DistributionError::NotInitialized)
    }

    fn stdev(&self) -> Result<f64> {
        self.params
            .map(|b| (b.n as f64 * b.p * (1.0 - b.p)).sqrt())
            .ok_or(DistributionError::NotInitialized)
    }

    /// PMF at `x` when `x` is a whole number in `[0, n]`, else 0.
    fn density(&self, x: f64) -> Result<f64> {
        let n = self.n()?;
        if x.fract() != 0.0 || x < 0.0 || x > n as f64 {
            return Ok(0.0);
        }
        self.pmf(x as u64)
    }

    fn combine(&self, other: &Self) -> Result<Self> {
        let a = self.params.ok_or(DistributionError::NotInitialized)?;
        let b = other.params.ok_or(DistributionError::NotInitialized)?;
        if a.p != b.p {
            return Err(DistributionError::InvalidParameters(format!(
                "Binomial combine requires equal p, got {} and {}",
                a.p, b.p
            )));
        }
        let n = a.n.checked_add(b.n).ok_or_else(|| {
            DistributionError::InvalidParameters(format!(
                "Binomial combine overflows n: {} + {}",
                a.n, b.n
            ))
        })?;
        debug!(family = %FamilyKind::Binomial, p = a.p, n, "combined distributions");
        Ok(Self {
            data: Vec::new(),
            params: Some(BinomialParams { p: a.p, n }),
        })
    }

    fn describe(&self) -> String {
        match (self.mean(), self.stdev(), self.params) {
            (Ok(mean), Ok(stdev), Some(BinomialParams { p, n })) => {
                format!("mean {mean}, standard deviation {stdev}, p {p}, n {n}")
            }
            _ => "uninitialized".to_string(),
        }
    }
}

impl fmt::Display for Binomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Tagged dispatch
// ============================================================================

/// Any supported family, dispatched by tag.
///
/// # Examples
/// ```
/// use u_dist::distributions::{Binomial, Distribution, Gaussian, Univariate};
/// use u_dist::DistributionError;
///
/// let g = Distribution::from(Gaussian::with_params(0.0, 1.0).unwrap());
/// let b = Distribution::from(Binomial::with_params(0.5, 10).unwrap());
/// assert!(matches!(
///     g.combine(&b),
///     Err(DistributionError::FamilyMismatch { .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    Gaussian(Gaussian),
    Binomial(Binomial),
}

macro_rules! dispatch {
    ($self:expr, $d:ident => $body:expr) => {
        match $self {
            Distribution::Gaussian($d) => $body,
            Distribution::Binomial($d) => $body,
        }
    };
}

impl Distribution {
    /// Creates an uninitialized instance of the given family.
    pub fn new(family: FamilyKind) -> Self {
        match family {
            FamilyKind::Gaussian => Distribution::Gaussian(Gaussian::new()),
            FamilyKind::Binomial => Distribution::Binomial(Binomial::new()),
        }
    }
}

impl From<Gaussian> for Distribution {
    fn from(g: Gaussian) -> Self {
        Distribution::Gaussian(g)
    }
}

impl From<Binomial> for Distribution {
    fn from(b: Binomial) -> Self {
        Distribution::Binomial(b)
    }
}

impl Univariate for Distribution {
    fn family(&self) -> FamilyKind {
        dispatch!(self, d => d.family())
    }

    fn load_with(&mut self, observations: &[f64], spread: Spread) -> Result<()> {
        dispatch!(self, d => d.load_with(observations, spread))
    }

    fn data(&self) -> &[f64] {
        dispatch!(self, d => d.data())
    }

    fn mean(&self) -> Result<f64> {
        dispatch!(self, d => d.mean())
    }

    fn stdev(&self) -> Result<f64> {
        dispatch!(self, d => d.stdev())
    }

    fn density(&self, x: f64) -> Result<f64> {
        dispatch!(self, d => d.density(x))
    }

    fn combine(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Distribution::Gaussian(a), Distribution::Gaussian(b)) => {
                a.combine(b).map(Distribution::Gaussian)
            }
            (Distribution::Binomial(a), Distribution::Binomial(b)) => {
                a.combine(b).map(Distribution::Binomial)
            }
            _ => Err(DistributionError::FamilyMismatch {
                left: self.family(),
                right: other.family(),
            }),
        }
    }

    fn describe(&self) -> String {
        dispatch!(self, d => d.describe())
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

// ============================================================================
// Tests
// ============================================================================
