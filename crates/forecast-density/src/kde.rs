//! Gaussian kernel density estimation

use forecast_core::utils::{check_finite, check_non_empty, std_dev};
use forecast_core::{Error, Result};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::bandwidth::Bandwidth;
use crate::traits::DensityEstimator;

/// Gaussian kernel density estimate over a one-dimensional sample set
///
/// Every sample contributes a normal kernel with standard deviation
/// `factor * s`, where `s` is the sample standard deviation (n - 1
/// denominator) and `factor` comes from the [`Bandwidth`] rule.
///
/// # Examples
///
/// ```rust
/// use forecast_density::{Bandwidth, DensityEstimator, GaussianKde};
///
/// let members = vec![9.8, 10.4, 10.1, 11.0, 9.5, 10.7, 10.2];
/// let kde = GaussianKde::new(&members, Bandwidth::Silverman).unwrap();
///
/// assert!(kde.density(10.2) > kde.density(12.0));
/// assert!((kde.total_mass() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    sample_std: f64,
    factor: f64,
    kernel_width: f64,
    standard: Normal,
}

impl GaussianKde {
    /// Build the estimate; fails on empty, non-finite or zero-spread samples
    pub fn new(samples: &[f64], bandwidth: Bandwidth) -> Result<Self> {
        check_non_empty(samples, "density estimation")?;
        check_finite(samples, "density samples")?;

        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| Error::InvalidInput(format!("standard normal kernel: {e}")))?;
        let sample_std = std_dev(samples);

        let mut kde = Self {
            samples: samples.to_vec(),
            sample_std,
            factor: 1.0,
            kernel_width: sample_std,
            standard,
        };

        let factor = bandwidth.factor(&kde);
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "bandwidth factor must be positive, got {factor}"
            )));
        }

        let kernel_width = factor * sample_std;
        if !kernel_width.is_finite() || kernel_width <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "kernel width must be positive, got {kernel_width} (sample std {sample_std})"
            )));
        }

        kde.factor = factor;
        kde.kernel_width = kernel_width;
        Ok(kde)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction rejects empty samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample standard deviation (n - 1 denominator)
    pub fn sample_std(&self) -> f64 {
        self.sample_std
    }

    /// Resolved bandwidth factor
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Standard deviation of each kernel
    pub fn kernel_width(&self) -> f64 {
        self.kernel_width
    }
}

impl DensityEstimator for GaussianKde {
    fn samples(&self) -> &[f64] {
        &self.samples
    }

    fn density(&self, x: f64) -> f64 {
        let h = self.kernel_width;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&xi| self.standard.pdf((x - xi) / h))
            .sum();
        sum / (self.samples.len() as f64 * h)
    }

    fn integral(&self, lower: f64, upper: f64) -> f64 {
        if lower == upper {
            return 0.0;
        }
        let h = self.kernel_width;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&xi| kernel_mass(&self.standard, (lower - xi) / h, (upper - xi) / h))
            .sum();
        sum / self.samples.len() as f64
    }
}

/// Standard normal mass between two standardized bounds (signed)
///
/// Both tails are evaluated directly when the bounds lie on the same side
/// of zero to keep precision far from the centre.
fn kernel_mass(standard: &Normal, lower: f64, upper: f64) -> f64 {
    let cdf = |z: f64| {
        if z == f64::INFINITY {
            1.0
        } else if z == f64::NEG_INFINITY {
            0.0
        } else {
            standard.cdf(z)
        }
    };
    let tail = |z: f64| cdf(-z);

    if lower > 0.0 && upper > 0.0 {
        tail(lower) - tail(upper)
    } else if lower < 0.0 && upper < 0.0 {
        cdf(upper) - cdf(lower)
    } else {
        (1.0 - tail(upper)) - (1.0 - tail(lower))
    }
}
