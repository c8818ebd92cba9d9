//! A set of analyst adjustments applied to a forecast in a fixed order

use forecast_core::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transform::{blend_with_report, shift, spread};

/// Spread, shift and blend settings for one adjustment pass
///
/// [`Adjustment::apply`] runs spread, then shift, then the blend towards
/// climatology, skipping any setting left at its identity value.
///
/// # Examples
///
/// ```rust
/// use forecast_adjust::Adjustment;
///
/// let adjustment = Adjustment { spread: 2.0, shift: 1.0, ..Default::default() };
/// let adjusted = adjustment.apply(&[1.0, 2.0, 3.0], &[]).unwrap();
/// assert_eq!(adjusted, vec![1.0, 3.0, 5.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustment {
    /// Scale applied to distances from the mean (1 = unchanged)
    pub spread: f64,
    /// Constant added to every value (0 = unchanged)
    pub shift: f64,
    /// Percentage of the climatology distribution to blend in (0 = unchanged)
    pub blend: f64,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self {
            spread: 1.0,
            shift: 0.0,
            blend: 0.0,
        }
    }
}

impl Adjustment {
    /// True when applying this adjustment leaves values unchanged
    pub fn is_identity(&self) -> bool {
        self.spread == 1.0 && self.shift == 0.0 && self.blend == 0.0
    }

    /// Apply the adjustment to `forecast`, blending towards `climatology`
    ///
    /// `climatology` is only read when `blend` is non-zero.
    pub fn apply(&self, forecast: &[f64], climatology: &[f64]) -> Result<Vec<f64>> {
        let mut values = forecast.to_vec();

        if self.spread != 1.0 {
            values = spread(&values, self.spread)?;
        }
        if self.shift != 0.0 {
            values = shift(&values, self.shift);
        }
        if self.blend != 0.0 {
            values = blend_with_report(&values, climatology, self.blend)?.values;
        }

        debug!(spread = self.spread, shift = self.shift, blend = self.blend, "adjustment applied");
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use forecast_core::utils::mean;
    use forecast_core::Error;

    #[test]
    fn test_default_is_identity() {
        let adjustment = Adjustment::default();
        assert!(adjustment.is_identity());
        let values = [4.0, 1.0, 7.5];
        assert_eq!(adjustment.apply(&values, &[]).unwrap(), values.to_vec());
    }

    #[test]
    fn test_identity_skips_validation() {
        // Nothing to spread or blend, so empty forecasts pass through
        assert!(Adjustment::default().apply(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_order_spread_then_shift() {
        let adjustment = Adjustment {
            spread: 0.5,
            shift: -1.0,
            blend: 0.0,
        };
        assert_eq!(adjustment.apply(&[0.0, 4.0], &[]).unwrap(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_full_blend_to_climatology() {
        let adjustment = Adjustment {
            shift: 100.0,
            blend: 100.0,
            ..Default::default()
        };
        let adjusted = adjustment.apply(&[1.0, 2.0, 3.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(mean(&adjusted), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_blend_errors_propagate() {
        let adjustment = Adjustment {
            blend: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            adjustment.apply(&[1.0, 2.0], &[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let adjustment: Adjustment = serde_json::from_str(r#"{"shift": 1.5}"#).unwrap();
        assert_eq!(adjustment.spread, 1.0);
        assert_eq!(adjustment.shift, 1.5);
        assert_eq!(adjustment.blend, 0.0);
    }
}
