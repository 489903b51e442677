//! # u-dist
//!
//! Fitted univariate probability distributions.
//!
//! A distribution is fitted to an ordered sample of observations, evaluates
//! its density, describes itself as one line of text, produces points for an
//! external plotting collaborator, and combines with another distribution of
//! the same family into the distribution of their independent sum.
//!
//! ## Modules
//!
//! - [`distributions`] — Gaussian and Binomial families, the [`Univariate`]
//!   contract, and the tagged [`Distribution`] enum
//! - [`stats`] — Descriptive statistics with numerical stability guarantees
//! - [`special`] — Normal PDF and log-gamma approximations
//! - [`random`] — Seeded RNG and variate sampling
//! - [`io`] — Line-delimited observation reader
//!
//! ## Example
//!
//! ```
//! use u_dist::{Gaussian, Spread, Univariate};
//!
//! let mut a = Gaussian::new();
//! a.load_with(&[1.0, 2.0, 3.0, 4.0, 5.0], Spread::Population).unwrap();
//! let b = Gaussian::with_params(10.0, 1.0).unwrap();
//!
//! let sum = a.combine(&b).unwrap();
//! assert!((sum.mean().unwrap() - 13.0).abs() < 1e-12);
//! assert!((sum.stdev().unwrap() - 3.0_f64.sqrt()).abs() < 1e-12);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: reading parameters before they exist, or a
//!   density with zero spread, is an error rather than NaN/∞
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   compensated summation for the mean
//! - **Property-based testing**: mathematical invariants verified via proptest

pub mod distributions;
pub mod error;
pub mod io;
pub mod random;
pub mod special;
pub mod stats;

pub use distributions::{Binomial, Distribution, FamilyKind, Gaussian, Univariate};
pub use error::DistributionError;
pub use stats::Spread;
