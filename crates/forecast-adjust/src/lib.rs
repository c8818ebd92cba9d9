//! Analyst adjustments for ensemble forecasts
//!
//! Forecasters often correct a raw ensemble before issuing it: widening an
//! under-dispersed ensemble, removing a known bias or pulling the forecast
//! towards climatology when skill is low.
//!
//! - [`spread`]: scale distances from the ensemble mean
//! - [`shift`]: add a constant
//! - [`blend`] / [`blend_with_report`]: move the ensemble's mean and
//!   standard deviation towards another distribution, keeping its shape
//! - [`Adjustment`]: the three applied in order, as submitted for review
//!
//! # Examples
//!
//! ```rust
//! use forecast_adjust::{blend, spread};
//!
//! let forecast = vec![11.2, 12.0, 12.4, 13.1];
//! let climatology = vec![9.0, 10.0, 10.5, 11.0, 12.5];
//!
//! let wider = spread(&forecast, 1.5).unwrap();
//! let halfway = blend(&wider, &climatology, 50.0).unwrap();
//! assert_eq!(halfway.len(), forecast.len());
//! ```

pub mod adjustment;
pub mod transform;

pub use adjustment::Adjustment;
pub use transform::{blend, blend_with_report, shift, spread, BlendReport};

pub use forecast_core::{Error, Result};
