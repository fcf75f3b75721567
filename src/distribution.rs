//! Target distributions and the inverse transform that samples them
//!
use crate::SetupError;
use rand::Rng;
use statrs::distribution::ContinuousCDF;

///
/// Distribution that can be sampled by inversion of its CDF
///
pub trait InverseCdf {
    /// Cumulative distribution function `P(X ≤ x)`
    fn cdf(&self, x: f64) -> f64;

    /// Quantile function
    ///
    /// Returns `x` such that `cdf(x) = p` for `p ∈ (0, 1)`.
    /// `p = 0` and `p = 1` map to the ends of the support, which may be infinite.
    ///
    fn ppf(&self, p: f64) -> f64;
}

///
/// Normal distribution `N(loc, scale²)`
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    loc: f64,
    scale: f64,
    inner: statrs::distribution::Normal,
}

impl Normal {
    pub fn new(loc: f64, scale: f64) -> Result<Self, SetupError> {
        if !loc.is_finite() {
            return Err(SetupError::InvalidLocation(loc));
        } else if !(scale.is_finite() && scale > 0.0) {
            return Err(SetupError::InvalidScale(scale));
        }
        let inner = statrs::distribution::Normal::new(loc, scale)
            .map_err(|_| SetupError::InvalidScale(scale))?;
        Ok(Self { loc, scale, inner })
    }

    pub fn loc(&self) -> f64 {
        self.loc
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl InverseCdf for Normal {
    fn cdf(&self, x: f64) -> f64 {
        self.inner.cdf(x)
    }

    fn ppf(&self, p: f64) -> f64 {
        // statrs panics outside of [0, 1]
        if !(0.0..=1.0).contains(&p) {
            return f64::NAN;
        }
        self.inner.inverse_cdf(p)
    }
}

///
/// Sampler that draws from a distribution by inverting its CDF
///
/// Each sample is `ppf(u)` for a uniform `u ∈ [0, 1)`.
///
#[derive(Debug, Clone, Copy)]
pub struct InverseTransform<D> {
    dist: D,
}

impl<D: InverseCdf> InverseTransform<D> {
    pub fn new(dist: D) -> Self {
        Self { dist }
    }

    /// Map a single uniform draw onto the target distribution
    pub fn transform(&self, u: f64) -> f64 {
        self.dist.ppf(u)
    }

    pub fn distribution(&self) -> &D {
        &self.dist
    }
}

impl<D: InverseCdf> rand::distributions::Distribution<f64> for InverseTransform<D> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.transform(rng.gen::<f64>())
    }
}

/// Points of the CDF evenly spaced over `[0, 1]`
///
/// Used to draw the mapping between the input and output histograms.
///
pub fn cdf_curve(dist: &impl InverseCdf, n_points: usize) -> Vec<(f64, f64)> {
    let step = 1.0 / (n_points.max(2) - 1) as f64;
    (0..n_points.max(2))
        .map(|i| {
            let x = i as f64 * step;
            (x, dist.cdf(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_median_maps_to_median() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        assert_abs_diff_eq!(0.5, dist.ppf(0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(0.5, dist.cdf(0.5), epsilon = 1e-15);
    }

    #[test]
    fn test_one_sigma_below() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        assert_abs_diff_eq!(0.4, dist.ppf(0.1587), epsilon = 1e-4);
        assert_abs_diff_eq!(0.4, dist.ppf(0.15865525393145707), epsilon = 1e-10);
    }

    #[test]
    fn test_known_values() {
        let dist = Normal::new(0.0, 1.0).unwrap();
        assert_abs_diff_eq!(1.959963984540054, dist.ppf(0.975), epsilon = 1e-10);
        assert_abs_diff_eq!(-2.326347874040841, dist.ppf(0.01), epsilon = 1e-10);
        assert_abs_diff_eq!(0.8413447460685429, dist.cdf(1.0), epsilon = 1e-12);
        assert_abs_diff_eq!(2.866515718791939e-7, dist.cdf(-5.0), epsilon = 1e-16);
    }

    #[test]
    fn test_ppf_inverts_cdf() {
        let dist = Normal::new(0.5, 0.1).unwrap();

        for i in 1..100 {
            let p = i as f64 / 100.0;
            assert_relative_eq!(p, dist.cdf(dist.ppf(p)), max_relative = 1e-10);
        }
        // Deep tails
        for p in [1e-12, 1e-6, 1.0 - 1e-6] {
            assert_relative_eq!(p, dist.cdf(dist.ppf(p)), max_relative = 1e-6);
        }
    }

    #[test]
    fn test_ppf_ends_of_support() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        assert_eq!(f64::NEG_INFINITY, dist.ppf(0.0));
        assert_eq!(f64::INFINITY, dist.ppf(1.0));
    }

    #[test]
    fn test_ppf_outside_unit_interval() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        assert!(dist.ppf(-0.1).is_nan());
        assert!(dist.ppf(1.5).is_nan());
        assert!(dist.ppf(f64::NAN).is_nan());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(Err(SetupError::InvalidScale(0.0)), Normal::new(0.5, 0.0));
        assert_eq!(Err(SetupError::InvalidScale(-1.0)), Normal::new(0.5, -1.0));
        assert_eq!(
            Err(SetupError::InvalidLocation(f64::INFINITY)),
            Normal::new(f64::INFINITY, 1.0)
        );
        assert!(Normal::new(0.5, f64::NAN).is_err());
    }

    #[test]
    fn test_inverse_transform_sampling() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        let sampler = InverseTransform::new(dist);
        let mut rng = rand::rngs::StdRng::seed_from_u64(87674);

        let samples = (0..10000)
            .map(|_| rng.sample(&sampler))
            .collect::<Vec<_>>();

        let res = convergence::ks1_test(|x| dist.cdf(*x), samples).unwrap();

        // Print the test results in case of a failure
        println!("{:?}", res);
        assert!(res.p_value() > 0.001)
    }

    #[test]
    fn test_cdf_curve() {
        let dist = Normal::new(0.5, 0.1).unwrap();
        let curve = cdf_curve(&dist, 1024);

        assert_eq!(1024, curve.len());
        assert_eq!(0.0, curve[0].0);
        assert_relative_eq!(1.0, curve[1023].0);
        assert!(curve.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
