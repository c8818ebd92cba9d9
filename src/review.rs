//! Forecast review: adjust an ensemble, compare its density with climatology
//! and derive category probabilities
//!
//! [`ForecastReview`] holds the forecast ensemble and the climatological
//! observations for one variable and period. An analyst edits the ensemble
//! ([`ForecastReview::modify`], [`ForecastReview::overwrite`]), then
//! [`ForecastReview::calculate_pdfs`] builds both densities on a shared
//! grid, from which climatology boundaries and forecast probabilities
//! follow.

use forecast_adjust::Adjustment;
use forecast_category::{pdf_probabilities, BoundaryEstimator, BoundarySource, Categorizer};
use forecast_core::utils::{check_finite, check_non_empty};
use forecast_core::{Error, Result, Sequence, SynchronizedSequences};
use forecast_density::{Bandwidth, DensityEstimator, GaussianKde, LimitFinder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the value member in [`ForecastReview::ranked_members`]
pub const VALUES: &str = "values";
/// Name of the member-number member in [`ForecastReview::ranked_members`]
pub const MEMBERS: &str = "members";

/// Density settings for plotting grids
#[derive(Debug, Clone)]
pub struct PdfSettings {
    /// Number of grid points, also the limit search step count
    pub levels: usize,
    /// Larger values give wider plotting limits
    pub range_limiter: f64,
    pub bandwidth: Bandwidth,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            levels: 101,
            range_limiter: 40.0,
            bandwidth: Bandwidth::Silverman,
        }
    }
}

/// How category boundaries and probabilities are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySettings {
    pub categories: usize,
    #[serde(with = "source_name")]
    pub bounds_from: BoundarySource,
    #[serde(with = "source_name")]
    pub probs_from: BoundarySource,
}

impl Default for CategorySettings {
    fn default() -> Self {
        Self {
            categories: 5,
            bounds_from: BoundarySource::Pdf,
            probs_from: BoundarySource::Pdf,
        }
    }
}

/// (De)serialize a [`BoundarySource`] by its name
mod source_name {
    use forecast_category::BoundarySource;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(source: &BoundarySource, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(source.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BoundarySource, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Replacement of one forecast member's value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overwrite {
    pub index: usize,
    pub value: f64,
}

/// Density values of both distributions on a shared grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfCurves {
    pub points: Vec<f64>,
    pub forecast: Vec<f64>,
    pub climatology: Vec<f64>,
}

/// Everything the review tool shows after an edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    /// Forecast values, in member order
    pub values: Vec<f64>,
    pub curves: PdfCurves,
    /// Forecast probability of each climatological category
    pub probabilities: Vec<f64>,
    pub climatology_bounds: Vec<f64>,
}

/// A forecast ensemble under review against its climatology
///
/// # Examples
///
/// ```rust
/// use seasonal_forecast::review::{CategorySettings, ForecastReview, PdfSettings};
/// use seasonal_forecast::Adjustment;
///
/// let forecast = vec![10.9, 11.4, 10.2, 11.8, 10.6, 11.1, 12.0, 10.8];
/// let climatology = vec![9.1, 9.8, 10.4, 10.0, 11.2, 9.5, 10.8, 10.1, 9.9, 10.5];
///
/// let mut review = ForecastReview::new(forecast, climatology).unwrap();
/// review.modify(&Adjustment { blend: 25.0, ..Default::default() }).unwrap();
///
/// let outcome = review
///     .summarize(&PdfSettings::default(), &CategorySettings::default())
///     .unwrap();
/// assert_eq!(outcome.probabilities.len(), 5);
/// assert_eq!(outcome.curves.points.len(), 101);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReview {
    forecast: Vec<f64>,
    climatology: Vec<f64>,
}

impl ForecastReview {
    /// Start a review; both sample sets must be non-empty and finite
    pub fn new(forecast: Vec<f64>, climatology: Vec<f64>) -> Result<Self> {
        check_non_empty(&forecast, "forecast")?;
        check_non_empty(&climatology, "climatology")?;
        check_finite(&forecast, "forecast")?;
        check_finite(&climatology, "climatology")?;
        Ok(Self {
            forecast,
            climatology,
        })
    }

    pub fn forecast(&self) -> &[f64] {
        &self.forecast
    }

    pub fn climatology(&self) -> &[f64] {
        &self.climatology
    }

    /// Apply spread, shift and blend towards climatology
    ///
    /// The forecast is left untouched if the adjustment fails.
    pub fn modify(&mut self, adjustment: &Adjustment) -> Result<()> {
        self.forecast = adjustment.apply(&self.forecast, &self.climatology)?;
        Ok(())
    }

    /// Replace individual members' values
    ///
    /// All overwrites are checked before any is applied; later entries for
    /// the same index win.
    pub fn overwrite(&mut self, overwrites: &[Overwrite]) -> Result<()> {
        for ow in overwrites {
            if ow.index >= self.forecast.len() {
                return Err(Error::InvalidInput(format!(
                    "overwrite index {} out of range for {} members",
                    ow.index,
                    self.forecast.len()
                )));
            }
            if !ow.value.is_finite() {
                return Err(Error::non_finite("overwrite value"));
            }
        }
        for ow in overwrites {
            self.forecast[ow.index] = ow.value;
        }
        debug!(count = overwrites.len(), "forecast values overwritten");
        Ok(())
    }

    /// Build both densities and evaluate them on a shared grid
    pub fn calculate_pdfs(&self, settings: &PdfSettings) -> Result<PdfAnalysis> {
        let forecast = GaussianKde::new(&self.forecast, settings.bandwidth.clone())?;
        let climatology = GaussianKde::new(&self.climatology, settings.bandwidth.clone())?;

        let finder = LimitFinder::new(settings.levels, settings.range_limiter)?;
        let points = finder.shared_grid(&[&forecast, &climatology], settings.levels)?;
        debug!(
            levels = settings.levels,
            lower = points.first().copied(),
            upper = points.last().copied(),
            "density grid built"
        );

        Ok(PdfAnalysis {
            forecast_values: forecast.evaluate(&points),
            climatology_values: climatology.evaluate(&points),
            forecast,
            climatology,
            points,
        })
    }

    /// Densities, climatology boundaries and forecast probabilities in one pass
    pub fn summarize(
        &self,
        pdf_settings: &PdfSettings,
        categories: &CategorySettings,
    ) -> Result<ReviewOutcome> {
        let analysis = self.calculate_pdfs(pdf_settings)?;
        let bounds = analysis.climatology_bounds(categories.bounds_from, categories.categories)?;
        let probabilities = analysis.forecast_probabilities(&bounds, categories.probs_from)?;

        Ok(ReviewOutcome {
            values: self.forecast.clone(),
            curves: analysis.curves(),
            probabilities,
            climatology_bounds: bounds,
        })
    }

    /// Forecast values paired with member numbers, largest value first
    pub fn ranked_members(&self, members: &[i64]) -> Result<SynchronizedSequences> {
        let mut ranked = SynchronizedSequences::new([
            (VALUES, Sequence::Real(self.forecast.clone())),
            (MEMBERS, Sequence::Integer(members.to_vec())),
        ])?;
        ranked.sort_by(VALUES, true)?;
        Ok(ranked)
    }
}

/// Forecast and climatology densities on a shared plotting grid
#[derive(Debug, Clone)]
pub struct PdfAnalysis {
    forecast: GaussianKde,
    climatology: GaussianKde,
    points: Vec<f64>,
    forecast_values: Vec<f64>,
    climatology_values: Vec<f64>,
}

impl PdfAnalysis {
    pub fn forecast_pdf(&self) -> &GaussianKde {
        &self.forecast
    }

    pub fn climatology_pdf(&self) -> &GaussianKde {
        &self.climatology
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Boundaries of `categories` equally likely climatological categories
    pub fn climatology_bounds(&self, source: BoundarySource, categories: usize) -> Result<Vec<f64>> {
        let bounds = BoundaryEstimator::new(categories)?.estimate(source, &self.climatology)?;
        debug!(%source, ?bounds, "climatology boundaries");
        Ok(bounds)
    }

    /// Forecast probability of each category defined by `bounds`
    ///
    /// `Data` counts members with the default tie-breaks.
    pub fn forecast_probabilities(&self, bounds: &[f64], source: BoundarySource) -> Result<Vec<f64>> {
        match source {
            BoundarySource::Pdf => pdf_probabilities(&self.forecast, bounds),
            BoundarySource::Data => Categorizer::new(bounds)?.probabilities(self.forecast.samples()),
        }
    }

    pub fn curves(&self) -> PdfCurves {
        PdfCurves {
            points: self.points.clone(),
            forecast: self.forecast_values.clone(),
            climatology: self.climatology_values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn review() -> ForecastReview {
        ForecastReview::new(
            vec![11.0, 12.5, 11.8, 13.1, 12.2, 11.5],
            vec![9.0, 10.2, 9.7, 10.9, 10.1, 9.4, 10.6, 11.3],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_samples() {
        assert!(matches!(ForecastReview::new(vec![], vec![1.0]), Err(Error::InvalidInput(_))));
        assert!(matches!(
            ForecastReview::new(vec![1.0, f64::NAN], vec![1.0, 2.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overwrite() {
        let mut review = review();
        review
            .overwrite(&[Overwrite { index: 1, value: 20.0 }, Overwrite { index: 1, value: 14.0 }])
            .unwrap();
        assert_eq!(review.forecast()[1], 14.0);
    }

    #[test]
    fn test_overwrite_is_all_or_nothing() {
        let mut review = review();
        let before = review.forecast().to_vec();
        let result = review.overwrite(&[
            Overwrite { index: 0, value: 1.0 },
            Overwrite { index: 6, value: 2.0 },
        ]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(review.forecast(), before.as_slice());
    }

    #[test]
    fn test_modify_failure_leaves_forecast() {
        let mut review = ForecastReview::new(vec![5.0, 5.0], vec![1.0, 2.0]).unwrap();
        let result = review.modify(&Adjustment {
            blend: 50.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::DegenerateInput(_))));
        assert_eq!(review.forecast(), &[5.0, 5.0]);
    }

    #[test]
    fn test_modify_shift() {
        let mut review = review();
        review
            .modify(&Adjustment {
                shift: -1.0,
                ..Default::default()
            })
            .unwrap();
        assert_relative_eq!(review.forecast()[0], 10.0);
    }

    #[test]
    fn test_grid_covers_both_distributions() {
        let analysis = review().calculate_pdfs(&PdfSettings::default()).unwrap();
        let points = analysis.points();
        assert_eq!(points.len(), 101);
        assert!(points[0] < 9.0);
        assert!(points[100] > 13.1);

        let curves = analysis.curves();
        assert_eq!(curves.forecast.len(), 101);
        assert_eq!(curves.climatology.len(), 101);
        assert!(curves.forecast.iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn test_probabilities_from_both_sources() {
        let analysis = review().calculate_pdfs(&PdfSettings::default()).unwrap();
        let bounds = analysis.climatology_bounds(BoundarySource::Data, 3).unwrap();
        assert_eq!(bounds.len(), 2);

        let from_pdf = analysis.forecast_probabilities(&bounds, BoundarySource::Pdf).unwrap();
        let from_data = analysis.forecast_probabilities(&bounds, BoundarySource::Data).unwrap();
        assert_relative_eq!(from_pdf.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(from_data.iter().sum::<f64>(), 1.0, epsilon = 1e-12);

        // A warm forecast sits mostly in the upper tercile
        assert!(from_pdf[2] > 0.5);
        assert_eq!(from_data[2], 1.0);
    }

    #[test]
    fn test_invalid_category_count() {
        let analysis = review().calculate_pdfs(&PdfSettings::default()).unwrap();
        assert!(matches!(
            analysis.climatology_bounds(BoundarySource::Pdf, 1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ranked_members() {
        let review = ForecastReview::new(vec![2.0, 5.0, 3.0], vec![1.0, 2.0]).unwrap();
        let ranked = review.ranked_members(&[7, 8, 9]).unwrap();
        assert_eq!(ranked.reals(VALUES).unwrap(), &[5.0, 3.0, 2.0]);
        assert_eq!(ranked.integers(MEMBERS).unwrap(), &[8, 9, 7]);

        assert!(matches!(review.ranked_members(&[1, 2]), Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn test_category_settings_names() {
        let settings: CategorySettings =
            serde_json::from_str(r#"{"categories": 3, "probs_from": "data"}"#).unwrap();
        assert_eq!(settings.categories, 3);
        assert_eq!(settings.bounds_from, BoundarySource::Pdf);
        assert_eq!(settings.probs_from, BoundarySource::Data);
        assert!(serde_json::from_str::<CategorySettings>(r#"{"bounds_from": "model"}"#).is_err());
    }
}
