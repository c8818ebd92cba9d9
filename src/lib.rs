//! Statistical engine for reviewing seasonal ensemble forecasts
//!
//! The workspace crates cover the individual steps; this crate re-exports
//! them and adds the review workflow on top:
//!
//! - [`forecast_core`]: error type, sample statistics, synchronized sequences
//! - [`forecast_density`]: kernel density estimates and their limits
//! - [`forecast_category`]: equiprobable category boundaries and assignment
//! - [`forecast_adjust`]: spread, shift and blend adjustments
//! - [`config`]: observation series requests and forecast calendar helpers
//! - [`series`]: anomalies, daily means and ranking of observed series
//! - [`review`]: the forecast review workflow
//!
//! # Examples
//!
//! ```rust
//! use seasonal_forecast::prelude::*;
//!
//! let forecast = vec![14.2, 15.1, 14.8, 15.6, 14.5, 15.0, 16.1];
//! let climatology = vec![13.0, 14.1, 13.6, 14.9, 14.3, 13.8, 15.2, 14.0, 13.4, 14.6];
//!
//! let mut review = ForecastReview::new(forecast, climatology)?;
//! review.modify(&Adjustment { spread: 1.2, ..Default::default() })?;
//!
//! let analysis = review.calculate_pdfs(&PdfSettings::default())?;
//! let terciles = analysis.climatology_bounds(BoundarySource::Data, 3)?;
//! let probs = analysis.forecast_probabilities(&terciles, BoundarySource::Pdf)?;
//! assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-6);
//! # Ok::<(), seasonal_forecast::Error>(())
//! ```

pub mod config;
pub mod review;
pub mod series;

pub use forecast_adjust;
pub use forecast_category;
pub use forecast_core;
pub use forecast_density;

pub use config::{
    forecast_months, last_ten_years, month_number, sort_months, Aggregation, ForecastPeriod,
    SeriesConfig, SeriesConfigBuilder, Variable,
};
pub use forecast_adjust::{blend, blend_with_report, shift, spread, Adjustment, BlendReport};
pub use forecast_category::{
    category_counts, category_probabilities, pdf_percentile_boundaries, pdf_probabilities,
    percentile_boundaries, value_category, BoundaryEstimator, BoundarySource, BoundaryTie,
    Categorizer, MiddleTie,
};
pub use forecast_core::{Error, Result, Sequence, SynchronizedSequences};
pub use forecast_density::{
    pdf_points, Bandwidth, DensityEstimator, DensityLimits, GaussianKde, LimitFinder,
};
pub use review::{
    CategorySettings, ForecastReview, Overwrite, PdfAnalysis, PdfCurves, PdfSettings,
    ReviewOutcome,
};
pub use series::{
    anomalies, days_in_month, monthly_means, monthly_totals_to_daily_means, sort_last_ten,
    yearly_anomalies,
};

pub mod prelude {
    pub use crate::{
        Adjustment, Bandwidth, BoundarySource, BoundaryTie, CategorySettings, Categorizer,
        DensityEstimator, Error, ForecastReview, GaussianKde, MiddleTie, PdfSettings, Result,
        SeriesConfig, Variable,
    };
}
