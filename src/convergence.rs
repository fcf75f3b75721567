//! How close the animated output is to the target distribution
//!
//! After the last frame, the transformed samples are compared against the
//! target CDF with the one-sample Kolmogorov-Smirnov test. A small p-value
//! would mean the output histogram is not converging to the target shape.
//!
use crate::distribution::InverseCdf;
use std::f64::consts::PI;
use thiserror::Error;

///
/// Error that can be raised while testing the samples
///
#[derive(Debug, Error)]
pub enum ConvergenceError {
    /// Some of the samples cannot be placed in an ordered sequence (e.g. NaN in floats)
    #[error("Samples contain values that cannot be ordered (e.g. NaN for floats)")]
    ContainsNotSortableValues,
    #[error("At least one sample is required")]
    NoSamples,
}

/// Empirical cumulative distribution function
///
/// The value of ecdf for some `x ∈ [xᵢ, xᵢ₊₁)` is `i/N` where `N` is the total
/// number of samples.
///
/// ```
/// # use its_animation::convergence::{Ecdf, ConvergenceError};
/// # fn main() -> Result<(), ConvergenceError> {
/// let ecdf = Ecdf::new(vec![0.1, 0.0, 0.7 ,0.2])?;
///
/// for (ecdf_value, s) in &ecdf {
///     println!("{s} {ecdf_value}")
/// }
/// # Ok(())}
/// ```
///
#[derive(Debug, Clone)]
pub struct Ecdf<T>
where
    T: PartialOrd + Copy,
{
    samples: Vec<T>,
}

impl<T> Ecdf<T>
where
    T: PartialOrd + Copy,
{
    /// Create a new instance from unordered vector of samples
    pub fn new(mut samples: Vec<T>) -> Result<Self, ConvergenceError> {
        if samples.iter().any(|s| s.partial_cmp(s).is_none()) {
            return Err(ConvergenceError::ContainsNotSortableValues);
        }
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Ok(Self { samples })
    }

    /// Value of ecdf at `val`
    pub fn get(&self, val: T) -> f64 {
        let idx = self.samples.partition_point(|x| *x <= val);
        idx as f64 / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Iterator over pairs (ecdf_value, sample) of an [Ecdf]
#[derive(Debug, Clone)]
pub struct EcdfIterator<'a, T>
where
    T: PartialOrd + Copy,
{
    ecdf: &'a Ecdf<T>,
    idx: usize,
}

impl<'a, T> Iterator for EcdfIterator<'a, T>
where
    T: PartialOrd + Copy,
{
    type Item = (f64, T);
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.ecdf.samples.get(self.idx)?;
        self.idx += 1;
        Some((self.idx as f64 / self.ecdf.len() as f64, *x))
    }
}

impl<'a, T> IntoIterator for &'a Ecdf<T>
where
    T: PartialOrd + Copy,
{
    type Item = (f64, T);
    type IntoIter = EcdfIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        EcdfIterator { ecdf: self, idx: 0 }
    }
}

///
/// Result of a Kolmogorov-Smirnov test
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub stat: f64,
    p: f64,
    n: f64,
}

impl TestResult {
    /// Compute complement of Kolmogorov-Smirnov Cumulative Distribution Function
    ///
    /// Computes: `Q(z) = 1 - CDF(z)`
    ///
    /// Implementation is based on the power series definitions from
    /// "Numerical Recipes" by Press et al. (2007)
    ///
    fn complement_ks_cdf(z: f64) -> f64 {
        if z <= 0.0 {
            1.0
        } else if z < 1.18 {
            let factor = f64::sqrt(2.0 * PI) / z;
            let term = f64::exp(-PI * PI / 8. / (z * z));
            1.0 - factor * (term + term.powi(9) + term.powi(25) + term.powi(49))
        } else {
            let term = f64::exp(-2.0 * z * z);
            2.0 * (term - term.powi(4) + term.powi(9))
        }
    }

    /// # Arguments
    /// - `stat` - Value of the test statistic
    /// - `n` - effective sample size
    ///
    fn new_ks(stat: f64, n: f64) -> Self {
        let sqrt_n = f64::sqrt(n);
        let arg = sqrt_n + 0.12 + 0.11 / sqrt_n;
        let p = Self::complement_ks_cdf(arg * stat);
        Self { stat, n, p }
    }

    /// Probability of observing the data if the samples follow the target
    pub fn p_value(&self) -> f64 {
        self.p
    }

    pub fn sample_size(&self) -> usize {
        self.n as usize
    }
}

///
/// Perform one sample Kolmogorov-Smirnov statistical test
///
pub fn ks1_test<T>(cdf: impl Fn(&T) -> f64, samples: Vec<T>) -> Result<TestResult, ConvergenceError>
where
    T: PartialOrd + Copy,
{
    if samples.is_empty() {
        return Err(ConvergenceError::NoSamples);
    }
    let n = samples.len();
    let ecdf = Ecdf::new(samples)?;

    let mut stat = 0.0;
    let mut below = 0.0;

    // Check the gap both just before and at each step of the ecdf
    for (ecdf_value, v) in &ecdf {
        let f = cdf(&v);
        stat = f64::max(stat, f64::max((f - below).abs(), (f - ecdf_value).abs()));
        below = ecdf_value;
    }

    Ok(TestResult::new_ks(stat, n as f64))
}

/// Test the inverse transform of uniform draws against the target CDF
///
/// Draws mapped outside of the target's support (infinite values for a
/// draw of exactly 0) are kept, the CDF handles them.
///
pub fn check_output<D: InverseCdf>(
    dist: &D,
    draws: &[f64],
) -> Result<TestResult, ConvergenceError> {
    let output = draws.iter().map(|u| dist.ppf(*u)).collect();
    ks1_test(|x| dist.cdf(*x), output)
}
