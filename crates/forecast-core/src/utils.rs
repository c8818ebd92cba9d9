//! Utility functions for working with sample slices

use crate::{Error, Result};

/// Sort data and return a new vector
///
/// Uses IEEE total ordering, so NaN values are placed at the end.
///
/// # Examples
///
/// ```rust
/// use forecast_core::utils::sorted;
///
/// let data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// assert_eq!(sorted(&data), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Calculate the mean of a slice
///
/// Returns 0.0 for empty slices.
///
/// # Examples
///
/// ```rust
/// use forecast_core::utils::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(mean(&[]), 0.0);
/// ```
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Calculate the sample standard deviation (n - 1 denominator)
///
/// Returns 0.0 for slices with less than 2 elements.
///
/// # Examples
///
/// ```rust
/// use forecast_core::utils::std_dev;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let sd = std_dev(&data);
/// assert!((sd - 1.58113883).abs() < 1e-6);
/// ```
pub fn std_dev(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    (sum_squared_deviations(data) / (data.len() - 1) as f64).sqrt()
}

/// Calculate the population standard deviation (n denominator)
///
/// Returns 0.0 for empty slices.
pub fn population_std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    (sum_squared_deviations(data) / data.len() as f64).sqrt()
}

fn sum_squared_deviations(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter()
        .map(|&x| {
            let diff = x - m;
            diff * diff
        })
        .sum()
}

/// `num` evenly spaced values over the closed interval `[start, stop]`
///
/// # Examples
///
/// ```rust
/// use forecast_core::utils::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// ```
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Linear-interpolation percentile of pre-sorted data
///
/// `percent` is in [0, 100]. The rank is `percent / 100 * (n - 1)` and the
/// result interpolates between the two neighbouring order statistics.
pub fn percentile_sorted(sorted_data: &[f64], percent: f64) -> Result<f64> {
    if sorted_data.is_empty() {
        return Err(Error::empty_input("percentile"));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(Error::InvalidArgument(format!(
            "Percentile {percent} must be in [0, 100]"
        )));
    }

    let rank = percent / 100.0 * (sorted_data.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted_data.len() - 1);
    let fraction = rank - lower as f64;

    let lo = sorted_data[lower];
    let hi = sorted_data[upper];
    Ok(lo + (hi - lo) * fraction)
}

/// Round to a fixed number of decimal digits, ties to even
///
/// # Examples
///
/// ```rust
/// use forecast_core::utils::round_to;
///
/// assert_eq!(round_to(2.345678912, 8), 2.34567891);
/// assert_eq!(round_to(0.125, 2), 0.12);
/// ```
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Reject empty slices
pub fn check_non_empty(data: &[f64], context: &str) -> Result<()> {
    if data.is_empty() {
        return Err(Error::empty_input(context));
    }
    Ok(())
}

/// Reject slices containing NaN or infinite values
pub fn check_finite(data: &[f64], context: &str) -> Result<()> {
    if data.iter().any(|x| !x.is_finite()) {
        return Err(Error::non_finite(context));
    }
    Ok(())
}
