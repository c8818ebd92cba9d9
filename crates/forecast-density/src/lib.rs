//! Continuous density estimates for forecast and climatology samples
//!
//! This crate turns a discrete sample set (an ensemble forecast or a
//! climatological record) into a smooth probability density and finds the
//! domain over which that density is worth evaluating.
//!
//! # Key Features
//!
//! - **[`DensityEstimator`]**: the trait every consumer works against
//!   (`density`, signed `integral` with infinite bounds)
//! - **[`GaussianKde`]**: Gaussian kernel density estimate
//! - **[`Bandwidth`]**: Scott, Silverman, fixed factor or a custom rule
//! - **[`LimitFinder`]**: step-wise search for where the density becomes
//!   negligible, with a bounded iteration budget
//!
//! # Examples
//!
//! ```rust
//! use forecast_density::{Bandwidth, DensityEstimator, GaussianKde, LimitFinder};
//!
//! let climatology = vec![8.9, 9.4, 10.1, 9.7, 10.6, 9.2, 10.0, 11.1, 9.9, 10.3];
//! let kde = GaussianKde::new(&climatology, Bandwidth::Scott).unwrap();
//!
//! // Probability of a value below 9.5
//! let below = kde.integral(f64::NEG_INFINITY, 9.5);
//! assert!(below > 0.0 && below < 1.0);
//!
//! // Practical plotting domain
//! let limits = LimitFinder::new(101, 40.0).unwrap().find(&kde).unwrap();
//! assert!(limits.lower < 8.9 && limits.upper > 11.1);
//! ```

pub mod bandwidth;
pub mod kde;
pub mod limits;
pub mod traits;

pub use bandwidth::{Bandwidth, BandwidthFn};
pub use kde::GaussianKde;
pub use limits::{pdf_points, DensityLimits, LimitFinder};
pub use traits::DensityEstimator;

pub use forecast_core::{Error, Result};
