//! Equiprobable categories for forecast verification and display
//!
//! Forecasts are commonly communicated as probabilities of falling into
//! climatological categories (terciles, quintiles). This crate provides
//! both halves of that:
//!
//! - [`BoundaryEstimator`]: boundaries that split a climatology into `N`
//!   equally likely categories, from its density or from its samples
//! - [`Categorizer`]: tie-aware assignment of values to categories and
//!   the resulting counts and probabilities
//! - [`pdf_probabilities`]: category probabilities from a density
//!
//! # Examples
//!
//! ```rust
//! use forecast_category::{percentile_boundaries, pdf_probabilities, Categorizer};
//! use forecast_density::{Bandwidth, GaussianKde};
//!
//! let climatology = vec![9.1, 9.8, 10.4, 10.0, 11.2, 9.5, 10.8, 10.1, 9.9];
//! let forecast = vec![10.6, 11.0, 10.2, 11.5, 10.9];
//!
//! let quintiles = percentile_boundaries(&climatology, 5).unwrap();
//! assert_eq!(quintiles.len(), 4);
//!
//! let from_members = Categorizer::new(&quintiles).unwrap().probabilities(&forecast).unwrap();
//! assert!((from_members.iter().sum::<f64>() - 1.0).abs() < 1e-12);
//!
//! let kde = GaussianKde::new(&forecast, Bandwidth::Silverman).unwrap();
//! let from_density = pdf_probabilities(&kde, &quintiles).unwrap();
//! assert!((from_density.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

pub mod boundaries;
pub mod categorizer;

pub use boundaries::{
    pdf_percentile_boundaries, percentile_boundaries, BoundaryEstimator, BoundarySource,
    BOUNDARY_DECIMALS, DEFAULT_ACCURACY,
};
pub use categorizer::{
    category_counts, category_probabilities, pdf_probabilities, value_category, BoundaryTie,
    Categorizer, MiddleTie,
};

pub use forecast_core::{Error, Result};
