use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::ModelParams;
use crate::error::{ForesightError, Result};

/// One historical data point as received on the wire.
///
/// Extra fields in the record are ignored, matching the request contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Timestamp string, coerced by [`parse_timestamp`].
    pub ds: String,
    /// Observed value.
    pub y: f64,
}

/// Training history in tabular form: parallel timestamp / value columns.
///
/// Ordering, duplicates, and gaps in the input are passed through to the
/// fitting capability uninterpreted.
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    pub timestamps: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}

impl TrainingHistory {
    /// Coerce raw observations into the tabular form.
    ///
    /// Fails on an empty sequence, an unparsable `ds`, or a non-finite `y`.
    pub fn from_observations(observations: &[Observation]) -> Result<Self> {
        if observations.is_empty() {
            return Err(ForesightError::InvalidInput("No data provided".into()));
        }

        let mut timestamps = Vec::with_capacity(observations.len());
        let mut values = Vec::with_capacity(observations.len());
        for (i, obs) in observations.iter().enumerate() {
            let ts = parse_timestamp(&obs.ds).map_err(|e| {
                ForesightError::InvalidInput(format!("record {i}: {e}"))
            })?;
            if !obs.y.is_finite() {
                return Err(ForesightError::InvalidInput(format!(
                    "record {i}: non-finite value {}",
                    obs.y
                )));
            }
            timestamps.push(ts);
            values.push(obs.y);
        }

        Ok(Self { timestamps, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last observed timestamp. History is never empty after construction.
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }
}

/// Parse a timestamp string in any of the accepted formats.
///
/// Accepts RFC 3339 (offset is normalized to UTC and dropped), date-time
/// with a `T` or space separator (optional fractional seconds), and a bare
/// date (midnight).
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(ForesightError::InvalidInput(format!(
        "unparsable timestamp: {s:?}"
    )))
}

/// Render a timestamp as a second-precision ISO-8601 string for transport.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Trait the external fitting capability is consumed through.
///
/// Fit on the history with the given hyperparameters, then evaluate the
/// fitted model over `prediction_ds` (history axis plus the requested
/// continuation). The returned columns are row-aligned with
/// `prediction_ds`.
pub trait ForecastModel {
    fn name(&self) -> &str;

    fn fit_predict(
        &mut self,
        history: &TrainingHistory,
        params: &ModelParams,
        prediction_ds: &[NaiveDateTime],
    ) -> Result<ModelPredictions>;
}

/// Raw output of a fitted model over a prediction axis.
#[derive(Debug, Clone)]
pub struct ModelPredictions {
    /// Point forecast.
    pub yhat: Vec<f64>,
    /// Lower uncertainty bound.
    pub yhat_lower: Vec<f64>,
    /// Upper uncertainty bound.
    pub yhat_upper: Vec<f64>,
    /// Trend component.
    pub trend: Vec<f64>,
}

/// One future step of the forecast, in wire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
}

/// The single result bundle emitted per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Success {
        success: bool,
        forecast: Vec<ForecastPoint>,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl Outcome {
    pub fn success(forecast: Vec<ForecastPoint>) -> Self {
        Outcome::Success {
            success: true,
            forecast,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Outcome::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Success { success, .. } | Outcome::Failure { success, .. } => *success,
        }
    }
}

impl From<ForesightError> for Outcome {
    fn from(err: ForesightError) -> Self {
        Outcome::failure(err.to_string())
    }
}
