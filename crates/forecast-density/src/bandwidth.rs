//! Kernel bandwidth selection
//!
//! The bandwidth is expressed as a dimensionless factor applied to the
//! sample standard deviation, so a factor of 1 means each kernel is as wide
//! as the data itself.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use forecast_core::Error;

use crate::kde::GaussianKde;

/// Function computing a bandwidth factor from an estimator
pub type BandwidthFn = Arc<dyn Fn(&GaussianKde) -> f64 + Send + Sync>;

/// How the kernel bandwidth factor is chosen
#[derive(Clone, Default)]
pub enum Bandwidth {
    /// Scott's rule: `n^(-1/5)`
    #[default]
    Scott,
    /// Silverman's rule: `(3n/4)^(-1/5)`
    Silverman,
    /// A fixed factor
    Factor(f64),
    /// A deterministic function of the estimator (samples already loaded)
    Custom(BandwidthFn),
}

impl Bandwidth {
    /// Wrap a closure as a custom bandwidth rule
    pub fn custom<F>(rule: F) -> Self
    where
        F: Fn(&GaussianKde) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(rule))
    }

    /// Resolve the factor for the given estimator
    pub fn factor(&self, kde: &GaussianKde) -> f64 {
        let n = kde.len() as f64;
        match self {
            Self::Scott => n.powf(-0.2),
            Self::Silverman => (n * 3.0 / 4.0).powf(-0.2),
            Self::Factor(factor) => *factor,
            Self::Custom(rule) => rule(kde),
        }
    }
}

impl fmt::Debug for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scott => write!(f, "Scott"),
            Self::Silverman => write!(f, "Silverman"),
            Self::Factor(factor) => write!(f, "Factor({factor})"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for Bandwidth {
    type Err = Error;

    /// Parse `"scott"`, `"silverman"` or a positive number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scott" => Ok(Self::Scott),
            "silverman" => Ok(Self::Silverman),
            other => match other.parse::<f64>() {
                Ok(factor) if factor.is_finite() && factor > 0.0 => Ok(Self::Factor(factor)),
                _ => Err(Error::unknown_option(s, &["scott", "silverman", "a positive number"])),
            },
        }
    }
}
