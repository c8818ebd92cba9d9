//! Finding where a density becomes negligible
//!
//! A kernel density never reaches zero, so plotting or integrating "the whole
//! density" needs a practical domain. [`LimitFinder`] walks outward from the
//! sample extremes in fixed steps until the density falls to a floor that is
//! a fraction of the density at those extremes.

use forecast_core::utils::linspace;
use forecast_core::{Error, Result};
use tracing::debug;

use crate::traits::DensityEstimator;

/// Lower and upper limit of a density's practical domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityLimits {
    pub lower: f64,
    pub upper: f64,
}

impl DensityLimits {
    /// Width of the domain
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Smallest interval containing both
    pub fn union(&self, other: &DensityLimits) -> DensityLimits {
        DensityLimits {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }
}

/// Step-wise search for density limits
///
/// - `levels` sets the step size: `(max - min) / levels`
/// - `range_limiter` sets the floor: the mean density at the sample extremes
///   divided by `range_limiter`. Larger values give wider limits.
/// - `max_steps` bounds each walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitFinder {
    levels: usize,
    range_limiter: f64,
    max_steps: usize,
}

impl Default for LimitFinder {
    fn default() -> Self {
        Self {
            levels: 50,
            range_limiter: 20.0,
            max_steps: 10_000,
        }
    }
}

impl LimitFinder {
    /// Create a finder with the given step count and range limiter
    pub fn new(levels: usize, range_limiter: f64) -> Result<Self> {
        if levels == 0 {
            return Err(Error::InvalidArgument("levels must be positive".to_string()));
        }
        if !range_limiter.is_finite() || range_limiter <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "range limiter must be positive, got {range_limiter}"
            )));
        }
        Ok(Self {
            levels,
            range_limiter,
            max_steps: Self::default().max_steps,
        })
    }

    /// Set the iteration budget for each walk
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn range_limiter(&self) -> f64 {
        self.range_limiter
    }

    /// Find the limits of a density
    ///
    /// The returned interval contains the sample range, and strictly contains
    /// it unless the density at the extremes is already at or below the floor.
    pub fn find<D: DensityEstimator + ?Sized>(&self, pdf: &D) -> Result<DensityLimits> {
        if pdf.samples().is_empty() {
            return Err(Error::empty_input("limit search"));
        }

        let min = pdf.sample_min();
        let max = pdf.sample_max();
        let floor = (pdf.density(min) + pdf.density(max)) / 2.0 / self.range_limiter;
        let step = (max - min) / self.levels as f64;

        let lower = self.walk(pdf, min, -step, floor, "lower")?;
        let upper = self.walk(pdf, max, step, floor, "upper")?;

        debug!(lower, upper, floor, step, "density limits found");
        Ok(DensityLimits { lower, upper })
    }

    fn walk<D: DensityEstimator + ?Sized>(
        &self,
        pdf: &D,
        start: f64,
        step: f64,
        floor: f64,
        side: &str,
    ) -> Result<f64> {
        let mut x = start;
        let mut steps = 0;

        while pdf.density(x) > floor {
            if step == 0.0 || steps >= self.max_steps {
                return Err(Error::NonConvergent {
                    iterations: steps,
                    context: format!(
                        "{side} density limit still above floor {floor} at {x}"
                    ),
                });
            }
            x += step;
            steps += 1;
        }

        Ok(x)
    }

    /// Evenly spaced evaluation points covering every estimator's limits
    ///
    /// The grid spans the union of the limits and has `points` entries.
    pub fn shared_grid(
        &self,
        estimators: &[&dyn DensityEstimator],
        points: usize,
    ) -> Result<Vec<f64>> {
        let mut limits: Option<DensityLimits> = None;
        for pdf in estimators {
            let found = self.find(*pdf)?;
            limits = Some(match limits {
                Some(current) => current.union(&found),
                None => found,
            });
        }

        let limits = limits
            .ok_or_else(|| Error::InvalidInput("no density estimators given".to_string()))?;
        Ok(linspace(limits.lower, limits.upper, points))
    }
}

/// Plotting grid of `levels` points covering every estimator
///
/// Limits are searched with the same `levels` and `range_limiter`, and the
/// grid spans their union.
pub fn pdf_points(
    estimators: &[&dyn DensityEstimator],
    levels: usize,
    range_limiter: f64,
) -> Result<Vec<f64>> {
    LimitFinder::new(levels, range_limiter)?.shared_grid(estimators, levels)
}
