use std::str::FromStr;

use chrono::{Duration, Months, NaiveDateTime};
use serde::Deserialize;

use crate::error::{ForesightError, Result};

/// Request-level forecast configuration, all fields optional.
///
/// Absent and `null` fields both fall back to the documented defaults;
/// unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub changepoint_prior_scale: Option<f64>,
    #[serde(default)]
    pub seasonality_prior_scale: Option<f64>,
    #[serde(default)]
    pub yearly_seasonality: Option<bool>,
    #[serde(default)]
    pub weekly_seasonality: Option<bool>,
    #[serde(default)]
    pub daily_seasonality: Option<bool>,
    #[serde(default)]
    pub periods: Option<i64>,
    #[serde(default)]
    pub freq: Option<String>,
}

impl ForecastConfig {
    /// Apply defaults and validate, producing the model hyperparameters
    /// and the future-axis shape.
    ///
    /// `periods < 1` and unrecognized `freq` codes are rejected here
    /// rather than passed through to the fitting capability.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let periods = self.periods.unwrap_or_else(default_periods);
        if periods < 1 {
            return Err(ForesightError::ConfigError(format!(
                "periods must be >= 1, got {periods}"
            )));
        }

        let freq = match &self.freq {
            Some(code) => code.parse()?,
            None => Frequency::default(),
        };

        Ok(ResolvedConfig {
            params: ModelParams {
                changepoint_prior_scale: self
                    .changepoint_prior_scale
                    .unwrap_or_else(default_changepoint_prior_scale),
                seasonality_prior_scale: self
                    .seasonality_prior_scale
                    .unwrap_or_else(default_seasonality_prior_scale),
                yearly_seasonality: self.yearly_seasonality.unwrap_or(true),
                weekly_seasonality: self.weekly_seasonality.unwrap_or(true),
                daily_seasonality: self.daily_seasonality.unwrap_or(false),
            },
            periods: periods as usize,
            freq,
        })
    }
}

/// Fully defaulted and validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub params: ModelParams,
    pub periods: usize,
    pub freq: Frequency,
}

/// Hyperparameters handed to the fitting capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
}

fn default_changepoint_prior_scale() -> f64 {
    0.05
}
fn default_seasonality_prior_scale() -> f64 {
    10.0
}
fn default_periods() -> i64 {
    30
}

/// Spacing of future steps, pandas-style frequency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    #[default]
    Daily,
    Weekly,
    /// Calendar months; day-of-month is clamped to the target month.
    Monthly,
    /// Calendar years (12-month steps).
    Yearly,
}

impl Frequency {
    /// The timestamp one step after `ts`.
    pub fn advance(&self, ts: NaiveDateTime) -> Result<NaiveDateTime> {
        let next = match self {
            Frequency::Secondly => ts.checked_add_signed(Duration::seconds(1)),
            Frequency::Minutely => ts.checked_add_signed(Duration::minutes(1)),
            Frequency::Hourly => ts.checked_add_signed(Duration::hours(1)),
            Frequency::Daily => ts.checked_add_signed(Duration::days(1)),
            Frequency::Weekly => ts.checked_add_signed(Duration::weeks(1)),
            Frequency::Monthly => ts.checked_add_months(Months::new(1)),
            Frequency::Yearly => ts.checked_add_months(Months::new(12)),
        };
        next.ok_or_else(|| {
            ForesightError::ConfigError(format!("timestamp overflow stepping {self:?} from {ts}"))
        })
    }
}

impl FromStr for Frequency {
    type Err = ForesightError;

    fn from_str(code: &str) -> Result<Self> {
        match code.to_ascii_uppercase().as_str() {
            "S" => Ok(Frequency::Secondly),
            "T" | "MIN" => Ok(Frequency::Minutely),
            "H" => Ok(Frequency::Hourly),
            "D" => Ok(Frequency::Daily),
            "W" => Ok(Frequency::Weekly),
            "M" | "MS" | "ME" => Ok(Frequency::Monthly),
            "Y" | "YS" | "A" => Ok(Frequency::Yearly),
            _ => Err(ForesightError::ConfigError(format!(
                "unsupported frequency code: {code:?}"
            ))),
        }
    }
}
