//! Observation series requests and forecast calendar helpers
//!
//! A [`SeriesConfig`] describes which observed series a forecast is compared
//! against: variable, months, years and region. Deriving the climatology
//! request for the same variable and season is a pure copy with a new year
//! span ([`SeriesConfig::with_years`]).

use std::fmt;
use std::str::FromStr;

use forecast_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default region of observation series
pub const DEFAULT_REGION: &str = "UK";

/// Default marker for missing observations
pub const DEFAULT_MISSING_VALUE: f64 = -99999.0;

/// Default climatological period (inclusive)
pub const DEFAULT_CLIMATOLOGY: (i32, i32) = (1981, 2010);

/// Three-letter month names, January first
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How monthly values combine over a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Total,
}

impl Aggregation {
    /// Combine the monthly values of one year
    pub fn apply(&self, values: &[f64]) -> Result<f64> {
        if values.is_empty() {
            return Err(Error::empty_input("seasonal aggregation"));
        }
        let total: f64 = values.iter().sum();
        Ok(match self {
            Self::Mean => total / values.len() as f64,
            Self::Total => total,
        })
    }
}

/// Observed variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variable {
    Temp,
    Tmax,
    Tmin,
    Precip,
    Sunshine,
    Airfrost,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Self::Temp,
        Self::Tmax,
        Self::Tmin,
        Self::Precip,
        Self::Sunshine,
        Self::Airfrost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temp => "temp",
            Self::Tmax => "tmax",
            Self::Tmin => "tmin",
            Self::Precip => "precip",
            Self::Sunshine => "sunshine",
            Self::Airfrost => "airfrost",
        }
    }

    /// Name of the published series
    pub fn series_name(&self) -> &'static str {
        match self {
            Self::Temp => "Tmean",
            Self::Tmax => "Tmax",
            Self::Tmin => "Tmin",
            Self::Precip => "Rainfall",
            Self::Sunshine => "Sunshine",
            Self::Airfrost => "AirFrost",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Self::Temp | Self::Tmax | Self::Tmin => "celsius",
            Self::Precip => "mm",
            Self::Sunshine => "hours",
            Self::Airfrost => "days",
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            Self::Temp | Self::Tmax | Self::Tmin => Aggregation::Mean,
            Self::Precip | Self::Sunshine | Self::Airfrost => Aggregation::Total,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                Error::unknown_option(s, &names)
            })
    }
}

/// Parameters of an observation series request
///
/// Build one with [`SeriesConfig::builder`]; months and years are stored
/// expanded, so a request for "Dec to Feb, 1981 to 2010" holds
/// `[12, 1, 2]` and thirty years.
///
/// # Examples
///
/// ```rust
/// use seasonal_forecast::config::{SeriesConfig, Variable};
///
/// let winter = SeriesConfig::builder(Variable::Precip)
///     .months(&[12, 2])
///     .years(&[2014, 2015])
///     .build()
///     .unwrap();
/// assert_eq!(winter.months, vec![12, 1, 2]);
///
/// let climatology = winter.climatology();
/// assert_eq!(climatology.years.len(), 30);
/// assert_eq!(climatology.months, winter.months);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub variable: Variable,
    pub months: Vec<u32>,
    pub years: Vec<i32>,
    pub region: String,
    pub months_are_bounds: bool,
    pub years_are_bounds: bool,
    pub missing_value: f64,
}

impl SeriesConfig {
    pub fn builder(variable: Variable) -> SeriesConfigBuilder {
        SeriesConfigBuilder::new(variable)
    }

    /// Same request over the inclusive year span `first..=last`
    pub fn with_years(&self, first: i32, last: i32) -> SeriesConfig {
        SeriesConfig {
            years: (first.min(last)..=first.max(last)).collect(),
            years_are_bounds: true,
            ..self.clone()
        }
    }

    /// Same request over the default climatological period
    pub fn climatology(&self) -> SeriesConfig {
        let (first, last) = DEFAULT_CLIMATOLOGY;
        self.with_years(first, last)
    }
}

/// Builder for [`SeriesConfig`]
#[derive(Debug, Clone)]
pub struct SeriesConfigBuilder {
    variable: Variable,
    months: Vec<u32>,
    years: Vec<i32>,
    region: String,
    months_are_bounds: bool,
    years_are_bounds: bool,
    missing_value: f64,
}

impl SeriesConfigBuilder {
    fn new(variable: Variable) -> Self {
        Self {
            variable,
            months: Vec::new(),
            years: Vec::new(),
            region: DEFAULT_REGION.to_string(),
            months_are_bounds: true,
            years_are_bounds: true,
            missing_value: DEFAULT_MISSING_VALUE,
        }
    }

    /// Months to load; empty means the whole year
    pub fn months(mut self, months: &[u32]) -> Self {
        self.months = months.to_vec();
        self
    }

    pub fn years(mut self, years: &[i32]) -> Self {
        self.years = years.to_vec();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Treat months as the first and last of a range (default true)
    pub fn months_are_bounds(mut self, bounds: bool) -> Self {
        self.months_are_bounds = bounds;
        self
    }

    /// Treat years as the first and last of a range (default true)
    pub fn years_are_bounds(mut self, bounds: bool) -> Self {
        self.years_are_bounds = bounds;
        self
    }

    pub fn missing_value(mut self, value: f64) -> Self {
        self.missing_value = value;
        self
    }

    pub fn build(self) -> Result<SeriesConfig> {
        let months = if self.months.is_empty() {
            (1..=12).collect()
        } else {
            self.months
        };
        if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(Error::InvalidInput(format!("months must fall within 1 and 12, got {bad}")));
        }

        let (first, last) = match (self.years.iter().min(), self.years.iter().max()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Err(Error::empty_input("series request years")),
        };
        let years = if self.years_are_bounds {
            (first..=last).collect()
        } else {
            self.years
        };

        Ok(SeriesConfig {
            variable: self.variable,
            months: sort_months(&months, self.months_are_bounds),
            years,
            region: self.region,
            months_are_bounds: self.months_are_bounds,
            years_are_bounds: self.years_are_bounds,
            missing_value: self.missing_value,
        })
    }
}

/// Order months, expanding bounds and wrapping through December
///
/// Ascending months are kept (or filled in when `are_bounds`). A list that
/// crosses the year end, such as `[11, 2]`, is read as a winter season and
/// expanded to `[11, 12, 1, 2]` when `are_bounds`.
pub fn sort_months(months: &[u32], are_bounds: bool) -> Vec<u32> {
    let (Some(&first), Some(&last)) = (months.first(), months.last()) else {
        return Vec::new();
    };

    if months.windows(2).all(|w| w[0] <= w[1]) {
        return if are_bounds {
            (first..=last).collect()
        } else {
            months.to_vec()
        };
    }
    if !are_bounds {
        return months.to_vec();
    }

    let mut expanded = Vec::with_capacity(12);
    let mut month = first;
    for _ in 0..12 {
        expanded.push(month);
        if month == last {
            break;
        }
        month = month % 12 + 1;
    }
    expanded
}

/// Month number (1-12) of a three-letter month name
pub fn month_number(name: &str) -> Result<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name.trim()))
        .map(|i| i as u32 + 1)
        .ok_or_else(|| Error::unknown_option(name, &MONTH_ABBREVIATIONS))
}

/// Length of a forecast period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastPeriod {
    /// One month
    #[serde(rename = "mon")]
    Month,
    /// Three months
    #[serde(rename = "seas")]
    Season,
}

impl ForecastPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "mon",
            Self::Season => "seas",
        }
    }

    /// Number of months covered
    pub fn months(&self) -> u32 {
        match self {
            Self::Month => 1,
            Self::Season => 3,
        }
    }
}

impl fmt::Display for ForecastPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" => Ok(Self::Month),
            "seas" => Ok(Self::Season),
            _ => Err(Error::unknown_option(s, &["mon", "seas"])),
        }
    }
}

pub(crate) fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("month must fall within 1 and 12, got {month}")))
    }
}

/// Months forecast by an issue in `issue_month`
///
/// A forecast covers the month(s) after its issue month, so an issue in
/// November gives `[12]` monthly and `[12, 1, 2]` seasonally.
pub fn forecast_months(issue_month: u32, period: ForecastPeriod) -> Result<Vec<u32>> {
    check_month(issue_month)?;
    Ok((1..=period.months())
        .map(|k| (issue_month + k - 1) % 12 + 1)
        .collect())
}

/// The ten years of observations preceding a forecast
///
/// Forecasts issued in December start in the following year, so their ten
/// years end with the issue year.
pub fn last_ten_years(issue_month: u32, issue_year: i32) -> Result<Vec<i32>> {
    check_month(issue_month)?;
    let start_year = if issue_month == 12 {
        issue_year + 1
    } else {
        issue_year
    };
    Ok((start_year - 10..start_year).collect())
}
