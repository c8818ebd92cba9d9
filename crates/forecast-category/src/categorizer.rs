//! Assigning values to categories and tallying category probabilities
//!
//! Categories are numbered from 1: with boundaries `b_1 <= ... <= b_k`,
//! category 1 holds values below `b_1` and category `k + 1` values above
//! `b_k`. A value exactly on a boundary is placed according to two
//! policies:
//!
//! - [`BoundaryTie`] for boundaries below or above the middle one:
//!   `Outer` pushes the value away from the centre, `Inner` towards it.
//! - [`MiddleTie`] for the middle boundary (odd boundary count only).

use std::fmt;
use std::str::FromStr;

use forecast_core::utils::sorted;
use forecast_core::{Error, Result};
use forecast_density::DensityEstimator;
use tracing::debug;

/// Placement of values equal to a non-middle boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryTie {
    /// Towards the middle category
    Inner,
    /// Away from the middle category
    #[default]
    Outer,
}

impl BoundaryTie {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
        }
    }
}

impl fmt::Display for BoundaryTie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryTie {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner" => Ok(Self::Inner),
            "outer" => Ok(Self::Outer),
            other => Err(Error::unknown_option(other, &["inner", "outer"])),
        }
    }
}

/// Placement of values equal to the middle boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MiddleTie {
    /// Into the category above the boundary
    #[default]
    Upper,
    /// Into the category below the boundary
    Lower,
}

impl MiddleTie {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }
}

impl fmt::Display for MiddleTie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MiddleTie {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            other => Err(Error::unknown_option(other, &["upper", "lower"])),
        }
    }
}

/// Maps values onto the categories defined by a set of boundaries
///
/// # Examples
///
/// ```rust
/// use forecast_category::{BoundaryTie, Categorizer};
///
/// let terciles = Categorizer::new(&[2.0, 3.0]).unwrap();
/// assert_eq!(terciles.assign(1.5).unwrap(), 1);
/// assert_eq!(terciles.assign(3.0).unwrap(), 3);
///
/// let inner = terciles.with_boundary_tie(BoundaryTie::Inner);
/// assert_eq!(inner.assign(3.0).unwrap(), 2);
///
/// let probs = inner.probabilities(&[1.0, 2.5, 2.6, 4.0]).unwrap();
/// assert_eq!(probs, vec![0.25, 0.5, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Categorizer {
    boundaries: Vec<f64>,
    boundary_tie: BoundaryTie,
    middle_tie: MiddleTie,
}

impl Categorizer {
    /// Create a categorizer; boundaries are sorted, NaN is rejected
    pub fn new(boundaries: &[f64]) -> Result<Self> {
        if boundaries.iter().any(|b| b.is_nan()) {
            return Err(Error::InvalidInput("category boundaries contain NaN".to_string()));
        }
        Ok(Self {
            boundaries: sorted(boundaries),
            boundary_tie: BoundaryTie::default(),
            middle_tie: MiddleTie::default(),
        })
    }

    pub fn with_boundary_tie(mut self, tie: BoundaryTie) -> Self {
        self.boundary_tie = tie;
        self
    }

    pub fn with_middle_tie(mut self, tie: MiddleTie) -> Self {
        self.middle_tie = tie;
        self
    }

    /// Sorted boundaries
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of categories (boundaries + 1)
    pub fn categories(&self) -> usize {
        self.boundaries.len() + 1
    }

    /// Category (1-based) of a single value
    pub fn assign(&self, value: f64) -> Result<usize> {
        if value.is_nan() {
            return Err(Error::InvalidInput("cannot categorize NaN".to_string()));
        }

        let middle = (self.boundaries.len() as f64 - 1.0) / 2.0;
        for (index, &bound) in self.boundaries.iter().enumerate() {
            if value > bound {
                continue;
            }
            if value < bound {
                return Ok(index + 1);
            }

            let position = index as f64;
            let category = if position < middle {
                match self.boundary_tie {
                    BoundaryTie::Inner => index + 2,
                    BoundaryTie::Outer => index + 1,
                }
            } else if position > middle {
                match self.boundary_tie {
                    BoundaryTie::Inner => index + 1,
                    BoundaryTie::Outer => index + 2,
                }
            } else {
                match self.middle_tie {
                    MiddleTie::Lower => index + 1,
                    MiddleTie::Upper => index + 2,
                }
            };
            return Ok(category);
        }

        Ok(self.boundaries.len() + 1)
    }

    /// Categories of every value, in input order
    pub fn assign_all(&self, values: &[f64]) -> Result<Vec<usize>> {
        values.iter().map(|&v| self.assign(v)).collect()
    }

    /// Number of values in each category
    pub fn counts(&self, values: &[f64]) -> Result<Vec<usize>> {
        let mut counts = vec![0; self.categories()];
        for &value in values {
            counts[self.assign(value)? - 1] += 1;
        }
        Ok(counts)
    }

    /// Fraction of values in each category
    pub fn probabilities(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.is_empty() {
            return Err(Error::empty_input("category probabilities"));
        }
        let total = values.len() as f64;
        let counts = self.counts(values)?;
        debug!(?counts, "category counts");
        Ok(counts.into_iter().map(|c| c as f64 / total).collect())
    }
}

/// Category (1-based) of `value` within `boundaries`
pub fn value_category(
    value: f64,
    boundaries: &[f64],
    boundary_tie: BoundaryTie,
    middle_tie: MiddleTie,
) -> Result<usize> {
    Categorizer::new(boundaries)?
        .with_boundary_tie(boundary_tie)
        .with_middle_tie(middle_tie)
        .assign(value)
}

/// Number of `values` falling in each category
pub fn category_counts(
    values: &[f64],
    boundaries: &[f64],
    boundary_tie: BoundaryTie,
    middle_tie: MiddleTie,
) -> Result<Vec<usize>> {
    Categorizer::new(boundaries)?
        .with_boundary_tie(boundary_tie)
        .with_middle_tie(middle_tie)
        .counts(values)
}

/// Fraction of `values` falling in each category
pub fn category_probabilities(
    values: &[f64],
    boundaries: &[f64],
    boundary_tie: BoundaryTie,
    middle_tie: MiddleTie,
) -> Result<Vec<f64>> {
    Categorizer::new(boundaries)?
        .with_boundary_tie(boundary_tie)
        .with_middle_tie(middle_tie)
        .probabilities(values)
}

/// Density mass in each category
///
/// The first and last categories extend to minus and plus infinity, so the
/// result sums to the estimator's total mass.
pub fn pdf_probabilities<D: DensityEstimator + ?Sized>(
    pdf: &D,
    boundaries: &[f64],
) -> Result<Vec<f64>> {
    if boundaries.iter().any(|b| b.is_nan()) {
        return Err(Error::InvalidInput("category boundaries contain NaN".to_string()));
    }

    let mut edges = Vec::with_capacity(boundaries.len() + 2);
    edges.push(f64::NEG_INFINITY);
    edges.extend(sorted(boundaries));
    edges.push(f64::INFINITY);

    Ok(edges.windows(2).map(|w| pdf.integral(w[0], w[1])).collect())
}
