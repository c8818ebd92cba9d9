//! Numeric operations on loaded observation series
//!
//! Observations arrive as one row per year with one column per requested
//! month, in the order given by [`SeriesConfig::months`].

use forecast_core::{Error, Result, Sequence, SynchronizedSequences};
use tracing::debug;

use crate::config::{check_month, Aggregation, SeriesConfig};

const VALUES: &str = "values";
const YEARS: &str = "years";

/// Mean of each month column across the year rows
pub fn monthly_means(rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let width = row_width(rows, "monthly means")?;
    let mut sums = vec![0.0; width];
    for row in rows {
        for (sum, value) in sums.iter_mut().zip(row) {
            *sum += value;
        }
    }
    let years = rows.len() as f64;
    Ok(sums.into_iter().map(|sum| sum / years).collect())
}

/// Subtract the climatological mean of each month from every year
///
/// `data` and `climatology` must share the same month columns.
pub fn anomalies(data: &[Vec<f64>], climatology: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let means = monthly_means(climatology)?;
    data.iter()
        .map(|row| {
            if row.len() != means.len() {
                return Err(Error::LengthMismatch {
                    expected: means.len(),
                    actual: row.len(),
                });
            }
            Ok(row.iter().zip(&means).map(|(v, m)| v - m).collect())
        })
        .collect()
}

/// Anomalies of yearly values that were already aggregated over months
///
/// The climatological reference is the same `aggregation` applied to the
/// monthly climatological means.
pub fn yearly_anomalies(
    data: &[f64],
    climatology: &[Vec<f64>],
    aggregation: Aggregation,
) -> Result<Vec<f64>> {
    let reference = aggregation.apply(&monthly_means(climatology)?)?;
    debug!(reference, ?aggregation, "removing yearly climatology");
    Ok(data.iter().map(|v| v - reference).collect())
}

/// Number of days in `month` of `year` (proleptic Gregorian)
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    check_month(month)?;
    Ok(match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    })
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Convert monthly totals into daily means for the requested series
///
/// Rows follow `config.years` and columns `config.months`. A month lower
/// than its predecessor belongs to the following year, so a December to
/// February season counts February of the next year. Variables that are
/// already monthly means are returned unchanged.
pub fn monthly_totals_to_daily_means(
    config: &SeriesConfig,
    totals: &[Vec<f64>],
) -> Result<Vec<Vec<f64>>> {
    if config.variable.aggregation() == Aggregation::Mean {
        debug!(variable = %config.variable, "series holds monthly means already");
        return Ok(totals.to_vec());
    }
    if totals.len() != config.years.len() {
        return Err(Error::LengthMismatch {
            expected: config.years.len(),
            actual: totals.len(),
        });
    }

    totals
        .iter()
        .zip(&config.years)
        .map(|(row, &first_year)| {
            if row.len() != config.months.len() {
                return Err(Error::LengthMismatch {
                    expected: config.months.len(),
                    actual: row.len(),
                });
            }
            let mut year = first_year;
            let mut previous: Option<u32> = None;
            row.iter()
                .zip(&config.months)
                .map(|(&total, &month)| {
                    if previous.is_some_and(|p| month < p) {
                        year += 1;
                    }
                    previous = Some(month);
                    Ok(total / f64::from(days_in_month(year, month)?))
                })
                .collect()
        })
        .collect()
}

/// Order yearly values largest first, keeping each value with its year
///
/// Equal values keep their chronological order.
pub fn sort_last_ten(values: &[f64], years: &[i32]) -> Result<(Vec<f64>, Vec<i32>)> {
    let mut paired = SynchronizedSequences::new([
        (VALUES, Sequence::Real(values.to_vec())),
        (YEARS, Sequence::Integer(years.iter().map(|&y| i64::from(y)).collect())),
    ])?;
    paired.sort_by(VALUES, true)?;

    let sorted_values = paired.reals(VALUES).unwrap_or_default().to_vec();
    let sorted_years = paired
        .integers(YEARS)
        .unwrap_or_default()
        .iter()
        .map(|&y| i32::try_from(y).map_err(|_| Error::InvalidInput(format!("year {y} out of range"))))
        .collect::<Result<Vec<_>>>()?;
    Ok((sorted_values, sorted_years))
}

fn row_width(rows: &[Vec<f64>], context: &str) -> Result<usize> {
    let width = rows.first().map(Vec::len).ok_or_else(|| Error::empty_input(context))?;
    if width == 0 {
        return Err(Error::empty_input(context));
    }
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(Error::LengthMismatch {
            expected: width,
            actual: row.len(),
        });
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variable;
    use approx::assert_relative_eq;

    #[test]
    fn test_monthly_anomalies() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let climatology = vec![vec![0.0, 2.0], vec![2.0, 4.0]];
        let out = anomalies(&data, &climatology).unwrap();
        assert_eq!(out, vec![vec![0.0, -1.0], vec![2.0, 1.0]]);
    }

    #[test]
    fn test_anomalies_shape_checks() {
        assert!(matches!(
            anomalies(&[vec![1.0, 2.0, 3.0]], &[vec![0.0, 2.0]]),
            Err(Error::LengthMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            monthly_means(&[vec![1.0, 2.0], vec![1.0]]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(monthly_means(&[]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_yearly_anomalies_follow_aggregation() {
        let climatology = vec![vec![1.0, 3.0], vec![3.0, 5.0]];
        let totals = yearly_anomalies(&[10.0, 12.0], &climatology, Aggregation::Total).unwrap();
        assert_eq!(totals, vec![4.0, 6.0]);
        let means = yearly_anomalies(&[10.0, 12.0], &climatology, Aggregation::Mean).unwrap();
        assert_eq!(means, vec![7.0, 9.0]);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2023, 4).unwrap(), 30);
        assert_eq!(days_in_month(2023, 12).unwrap(), 31);
        assert!(days_in_month(2023, 13).is_err());
    }

    #[test]
    fn test_daily_means_cross_year_end() {
        let config = SeriesConfig::builder(Variable::Precip)
            .months(&[12, 2])
            .years(&[2023, 2024])
            .build()
            .unwrap();
        assert_eq!(config.months, vec![12, 1, 2]);

        // Dec 2023, Jan 2024, Feb 2024 (leap) then Dec 2024, Jan 2025, Feb 2025
        let totals = vec![vec![62.0, 31.0, 58.0], vec![31.0, 62.0, 56.0]];
        let daily = monthly_totals_to_daily_means(&config, &totals).unwrap();
        for (row, expected) in daily.iter().zip([[2.0, 1.0, 2.0], [1.0, 2.0, 2.0]]) {
            for (a, b) in row.iter().zip(expected) {
                assert_relative_eq!(*a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_daily_means_of_mean_variable_unchanged() {
        let config = SeriesConfig::builder(Variable::Tmax).months(&[6]).years(&[2020]).build().unwrap();
        let data = vec![vec![21.5]];
        assert_eq!(monthly_totals_to_daily_means(&config, &data).unwrap(), data);
    }

    #[test]
    fn test_daily_means_reject_processed_data() {
        let config = SeriesConfig::builder(Variable::Precip)
            .months(&[1, 2])
            .years(&[2020, 2021])
            .build()
            .unwrap();
        assert!(matches!(
            monthly_totals_to_daily_means(&config, &[vec![1.0, 2.0]]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            monthly_totals_to_daily_means(&config, &[vec![1.0], vec![2.0]]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_sort_last_ten_keeps_years_paired() {
        let (values, years) =
            sort_last_ten(&[3.1, 5.2, 1.0, 5.2], &[2015, 2016, 2017, 2018]).unwrap();
        assert_eq!(values, vec![5.2, 5.2, 3.1, 1.0]);
        assert_eq!(years, vec![2016, 2018, 2015, 2017]);
    }

    #[test]
    fn test_sort_last_ten_length_mismatch() {
        assert!(matches!(
            sort_last_ten(&[1.0, 2.0], &[2020]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 })
        ));
    }
}
