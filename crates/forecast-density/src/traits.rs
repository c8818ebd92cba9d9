//! Core trait for continuous density estimates

/// A one-dimensional probability density built from a sample set
///
/// Implementations own their samples and are read-only once constructed.
pub trait DensityEstimator {
    /// The samples the density was built from
    fn samples(&self) -> &[f64];

    /// Density at `x` (never negative)
    fn density(&self, x: f64) -> f64;

    /// Probability mass between `lower` and `upper`
    ///
    /// Either bound may be infinite. The integral is signed: swapping the
    /// bounds negates it, so `integral(a, b) + integral(b, c) == integral(a, c)`
    /// holds for any ordering.
    fn integral(&self, lower: f64, upper: f64) -> f64;

    /// Smallest sample
    fn sample_min(&self) -> f64 {
        self.samples().iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample
    fn sample_max(&self) -> f64 {
        self.samples().iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Evaluate the density at each point
    fn evaluate(&self, points: &[f64]) -> Vec<f64> {
        points.iter().map(|&x| self.density(x)).collect()
    }

    /// Mass over the whole real line (should be 1 up to numerical error)
    fn total_mass(&self) -> f64 {
        self.integral(f64::NEG_INFINITY, f64::INFINITY)
    }
}
