//! Spread, shift and blend transforms for ensemble values
//!
//! All transforms are pure: they return new vectors in the input order.

use forecast_core::utils::{check_finite, check_non_empty, mean, population_std_dev};
use forecast_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Scale the distance of every value from the mean
///
/// `scale > 1` widens the distribution, `0 < scale < 1` narrows it and a
/// negative scale mirrors it around the mean.
///
/// # Examples
///
/// ```rust
/// use forecast_adjust::spread;
///
/// assert_eq!(spread(&[1.0, 2.0, 3.0], 2.0).unwrap(), vec![0.0, 2.0, 4.0]);
/// ```
pub fn spread(data: &[f64], scale: f64) -> Result<Vec<f64>> {
    check_non_empty(data, "spread")?;
    let centre = mean(data);
    Ok(data.iter().map(|&v| (v - centre) * scale + centre).collect())
}

/// Add a constant to every value
pub fn shift(data: &[f64], amount: f64) -> Vec<f64> {
    data.iter().map(|&v| v + amount).collect()
}

/// Result of a blend, with the moments it was mapped onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendReport {
    /// Blended values, in input order
    pub values: Vec<f64>,
    /// Mean of the blended distribution
    pub mean: f64,
    /// Population standard deviation of the blended distribution
    pub std_dev: f64,
    /// `true` when the blend percentage was outside `[0, 100]`
    pub extrapolated: bool,
}

/// Move `blend_data` towards the distribution of `fixed_data`
///
/// `pct` is the share (in percent) of the fixed distribution in the result:
/// 0 leaves the values unchanged, 100 gives them the fixed data's mean and
/// standard deviation. The shape of `blend_data` is preserved.
pub fn blend(blend_data: &[f64], fixed_data: &[f64], pct: f64) -> Result<Vec<f64>> {
    blend_with_report(blend_data, fixed_data, pct).map(|report| report.values)
}

/// [`blend`], also returning the target moments and the extrapolation flag
///
/// Percentages outside `[0, 100]` extrapolate past either distribution.
/// They are accepted, flagged in the report and logged as a warning.
pub fn blend_with_report(blend_data: &[f64], fixed_data: &[f64], pct: f64) -> Result<BlendReport> {
    check_non_empty(blend_data, "blend")?;
    check_non_empty(fixed_data, "blend")?;
    check_finite(blend_data, "blend data")?;
    check_finite(fixed_data, "fixed data")?;
    if !pct.is_finite() {
        return Err(Error::InvalidArgument(format!("blend percentage must be finite, got {pct}")));
    }

    let extrapolated = !(0.0..=100.0).contains(&pct);
    if extrapolated {
        warn!(pct, "blend percentage outside [0, 100], extrapolating");
    }

    let blend_mean = mean(blend_data);
    let fixed_mean = mean(fixed_data);
    let blend_std = population_std_dev(blend_data);
    let fixed_std = population_std_dev(fixed_data);
    if blend_std == 0.0 || fixed_std == 0.0 {
        return Err(Error::DegenerateInput(format!(
            "blend needs spread in both distributions (std {blend_std} and {fixed_std})"
        )));
    }

    let fixed_weight = pct / 100.0;
    let blend_weight = (100.0 - pct) / 100.0;
    let target_mean = blend_weight * blend_mean + fixed_weight * fixed_mean;
    // Mixture variance from central moments; negative only when extrapolating
    let offset = blend_mean - fixed_mean;
    let variance = blend_weight * blend_std * blend_std
        + fixed_weight * fixed_std * fixed_std
        + blend_weight * fixed_weight * offset * offset;
    if variance < 0.0 {
        return Err(Error::DegenerateInput(format!(
            "blended variance is negative ({variance}) at {pct}%"
        )));
    }
    let target_std = variance.sqrt();

    debug!(pct, target_mean, target_std, "blending towards fixed distribution");
    let values = blend_data
        .iter()
        .map(|&v| (v - blend_mean) / blend_std * target_std + target_mean)
        .collect();

    Ok(BlendReport {
        values,
        mean: target_mean,
        std_dev: target_std,
        extrapolated,
    })
}
