//! Boundary values that split a distribution into equally likely categories
//!
//! Two estimators are provided:
//!
//! - **From a density** ([`pdf_percentile_boundaries`]): scans the sample
//!   range on a fixed grid and interpolates where the accumulated mass
//!   crosses each `1/N` share. The grid size (`accuracy`) trades precision
//!   for cost; it is an approximation, not an exact inverse CDF.
//! - **From samples** ([`percentile_boundaries`]): linear-interpolation
//!   percentiles, rounded to 8 decimal digits so that values equal to a
//!   boundary compare equal when categorized.

use std::fmt;
use std::str::FromStr;

use forecast_core::utils::{check_finite, check_non_empty, linspace, percentile_sorted, round_to, sorted};
use forecast_core::{Error, Result};
use forecast_density::DensityEstimator;
use tracing::debug;

/// Default number of scan points for the density estimator
pub const DEFAULT_ACCURACY: usize = 50;

/// Decimal digits kept by sample percentile boundaries
pub const BOUNDARY_DECIMALS: i32 = 8;

/// Where category boundaries (or probabilities) are derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundarySource {
    /// The kernel density estimate
    #[default]
    Pdf,
    /// The raw samples
    Data,
}

impl BoundarySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for BoundarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundarySource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "data" => Ok(Self::Data),
            other => Err(Error::unknown_option(other, &["pdf", "data"])),
        }
    }
}

/// Estimator for the `N - 1` boundaries of `N` equally likely categories
///
/// # Examples
///
/// ```rust
/// use forecast_category::BoundaryEstimator;
///
/// let terciles = BoundaryEstimator::new(3).unwrap();
/// assert_eq!(terciles.from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap(), vec![2.0, 3.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEstimator {
    categories: usize,
    accuracy: usize,
}

impl BoundaryEstimator {
    /// Create an estimator for `categories` categories (at least 2)
    pub fn new(categories: usize) -> Result<Self> {
        if categories < 2 {
            return Err(Error::InvalidArgument(format!(
                "at least two categories are needed to split data, got {categories}"
            )));
        }
        Ok(Self {
            categories,
            accuracy: DEFAULT_ACCURACY,
        })
    }

    /// Set the number of scan points used by [`BoundaryEstimator::from_density`]
    pub fn with_accuracy(mut self, accuracy: usize) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn categories(&self) -> usize {
        self.categories
    }

    pub fn accuracy(&self) -> usize {
        self.accuracy
    }

    /// Boundaries splitting the density's mass into equal shares
    ///
    /// Returns `NonConvergent` when the scan grid is too coarse to locate
    /// every boundary inside the sample range.
    pub fn from_density<D: DensityEstimator + ?Sized>(&self, pdf: &D) -> Result<Vec<f64>> {
        if self.accuracy < 2 {
            return Err(Error::InvalidArgument(format!(
                "accuracy must be at least 2 scan points, got {}",
                self.accuracy
            )));
        }
        if pdf.samples().is_empty() {
            return Err(Error::empty_input("density boundary search"));
        }

        let wanted = self.categories - 1;
        let scan = linspace(pdf.sample_min(), pdf.sample_max(), self.accuracy);
        let share = 1.0 / self.categories as f64;

        let mut bounds = Vec::with_capacity(wanted);
        let mut lower = f64::NEG_INFINITY;

        for (i, &x) in scan.iter().enumerate() {
            let area = pdf.integral(lower, x);
            if area <= share {
                continue;
            }

            let boundary = if i == 0 {
                x
            } else {
                let previous = scan[i - 1];
                let overshoot = area - share;
                let shortfall = share - pdf.integral(lower, previous);
                let total = overshoot + shortfall;
                if total > 0.0 {
                    x - (x - previous) * (overshoot / total)
                } else {
                    x
                }
            };

            debug!(index = bounds.len(), boundary, scan_point = i, "density boundary found");
            bounds.push(boundary);
            if bounds.len() == wanted {
                return Ok(bounds);
            }
            lower = boundary;
        }

        Err(Error::NonConvergent {
            iterations: scan.len(),
            context: format!(
                "found {} of {wanted} boundaries; increase the accuracy",
                bounds.len()
            ),
        })
    }

    /// Boundaries at evenly spaced sample percentiles
    pub fn from_samples(&self, data: &[f64]) -> Result<Vec<f64>> {
        check_non_empty(data, "percentile boundaries")?;
        check_finite(data, "percentile boundaries")?;

        let ordered = sorted(data);
        let step = 100.0 / self.categories as f64;
        (1..self.categories)
            .map(|k| {
                let value = percentile_sorted(&ordered, k as f64 * step)?;
                Ok(round_to(value, BOUNDARY_DECIMALS))
            })
            .collect()
    }

    /// Boundaries from the chosen source
    pub fn estimate<D: DensityEstimator + ?Sized>(
        &self,
        source: BoundarySource,
        pdf: &D,
    ) -> Result<Vec<f64>> {
        match source {
            BoundarySource::Pdf => self.from_density(pdf),
            BoundarySource::Data => self.from_samples(pdf.samples()),
        }
    }
}

/// Estimate the boundaries splitting a density into equal areas
pub fn pdf_percentile_boundaries<D: DensityEstimator + ?Sized>(
    pdf: &D,
    categories: usize,
    accuracy: usize,
) -> Result<Vec<f64>> {
    BoundaryEstimator::new(categories)?
        .with_accuracy(accuracy)
        .from_density(pdf)
}

/// Return the boundaries splitting `data` into `categories` categories
pub fn percentile_boundaries(data: &[f64], categories: usize) -> Result<Vec<f64>> {
    BoundaryEstimator::new(categories)?.from_samples(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use forecast_density::{Bandwidth, GaussianKde};

    /// Uniform density on [0, 1]
    struct Uniform(Vec<f64>);

    impl DensityEstimator for Uniform {
        fn samples(&self) -> &[f64] {
            &self.0
        }

        fn density(&self, x: f64) -> f64 {
            if (0.0..=1.0).contains(&x) {
                1.0
            } else {
                0.0
            }
        }

        fn integral(&self, lower: f64, upper: f64) -> f64 {
            upper.clamp(0.0, 1.0) - lower.clamp(0.0, 1.0)
        }
    }

    #[test]
    fn test_terciles_of_four_values() {
        assert_eq!(percentile_boundaries(&[1.0, 2.0, 3.0, 4.0], 3).unwrap(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_sample_boundaries_ignore_order() {
        let data = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile_boundaries(&data, 2).unwrap(), vec![3.0]);
        assert_eq!(percentile_boundaries(&data, 4).unwrap(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sample_boundaries_are_rounded() {
        let data = [0.0, 1.0 / 3.0, 1.0];
        let bounds = percentile_boundaries(&data, 2).unwrap();
        assert_eq!(bounds, vec![0.33333333]);
    }

    #[test]
    fn test_quintiles_interpolate() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let bounds = percentile_boundaries(&data, 5).unwrap();
        assert_eq!(bounds, vec![2.8, 4.6, 6.4, 8.2]);
    }

    #[test]
    fn test_sample_boundary_errors() {
        assert!(matches!(percentile_boundaries(&[], 3), Err(Error::InvalidInput(_))));
        assert!(matches!(percentile_boundaries(&[1.0, 2.0], 1), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            percentile_boundaries(&[1.0, f64::NAN], 2),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_density_boundaries_on_uniform() {
        let uniform = Uniform(vec![0.0, 1.0]);
        let bounds = pdf_percentile_boundaries(&uniform, 4, 11).unwrap();
        assert_eq!(bounds.len(), 3);
        for (found, expected) in bounds.iter().zip([0.25, 0.5, 0.75]) {
            assert_relative_eq!(*found, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_density_boundaries_split_mass() {
        let data = [2.0, 3.5, 4.0, 4.2, 5.0, 5.5, 6.1, 7.0, 8.4];
        let kde = GaussianKde::new(&data, Bandwidth::Scott).unwrap();
        let bounds = pdf_percentile_boundaries(&kde, 5, 200).unwrap();

        assert_eq!(bounds.len(), 4);
        assert!(bounds.windows(2).all(|w| w[0] < w[1]));
        let mut lower = f64::NEG_INFINITY;
        for &b in &bounds {
            assert_relative_eq!(kde.integral(lower, b), 0.2, epsilon = 5e-3);
            lower = b;
        }
    }

    #[test]
    fn test_too_coarse_scan_does_not_converge() {
        // Only the two extremes are scanned; the tail beyond the maximum
        // holds more than one share, so the last boundary is never reached.
        let data = [0.0, 1.0, 2.0];
        let kde = GaussianKde::new(&data, Bandwidth::Factor(1.0)).unwrap();
        let err = pdf_percentile_boundaries(&kde, 10, 2).unwrap_err();
        assert!(matches!(err, Error::NonConvergent { iterations: 2, .. }));
    }

    #[test]
    fn test_density_boundary_arguments() {
        let uniform = Uniform(vec![0.0, 1.0]);
        assert!(matches!(
            pdf_percentile_boundaries(&uniform, 1, 50),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            pdf_percentile_boundaries(&uniform, 3, 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_source_parsing() {
        assert_eq!("pdf".parse::<BoundarySource>().unwrap(), BoundarySource::Pdf);
        assert_eq!("data".parse::<BoundarySource>().unwrap(), BoundarySource::Data);
        assert!(matches!("model".parse::<BoundarySource>(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_estimate_dispatch() {
        let uniform = Uniform(vec![0.0, 0.5, 1.0]);
        let estimator = BoundaryEstimator::new(2).unwrap().with_accuracy(21);
        assert_eq!(estimator.estimate(BoundarySource::Data, &uniform).unwrap(), vec![0.5]);
        let from_pdf = estimator.estimate(BoundarySource::Pdf, &uniform).unwrap();
        assert_relative_eq!(from_pdf[0], 0.5, epsilon = 1e-9);
    }
}
