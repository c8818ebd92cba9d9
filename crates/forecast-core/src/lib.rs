//! Core types for seasonal forecast statistics
//!
//! This crate provides the pieces shared by every other forecast crate:
//!
//! - [`Error`] / [`Result`]: the unified error type
//! - [`utils`]: sample statistics (mean, standard deviations, percentiles,
//!   evenly spaced grids)
//! - [`SynchronizedSequences`]: parallel named sequences (member values,
//!   member numbers, labels) that can only be reordered together
//!
//! # Example
//!
//! ```rust
//! use forecast_core::utils::{mean, percentile_sorted, sorted};
//!
//! let members = vec![12.1, 11.4, 13.0, 12.6, 11.9];
//! let ordered = sorted(&members);
//! let median = percentile_sorted(&ordered, 50.0).unwrap();
//!
//! assert_eq!(median, 12.1);
//! assert!((mean(&members) - 12.2).abs() < 1e-12);
//! ```

pub mod error;
pub mod paired;
pub mod utils;

pub use error::{Error, Result};
pub use paired::{Sequence, SynchronizedSequences};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
