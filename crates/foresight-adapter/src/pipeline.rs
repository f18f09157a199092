use chrono::NaiveDateTime;
use foresight_core::{
    format_timestamp, ForecastConfig, ForecastModel, ForecastPoint, ForesightError, Frequency,
    Observation, Outcome, Result, TrainingHistory,
};
use tracing::info;

/// Fit the model on `observations` and forecast the configured number of
/// future steps.
///
/// Every failure mode — coercion, validation, model faults — is collapsed
/// into a failure [`Outcome`]; this function never propagates an error.
pub fn run_forecast(
    model: &mut dyn ForecastModel,
    observations: &[Observation],
    config: &ForecastConfig,
) -> Outcome {
    match forecast(model, observations, config) {
        Ok(points) => Outcome::success(points),
        Err(err) => err.into(),
    }
}

fn forecast(
    model: &mut dyn ForecastModel,
    observations: &[Observation],
    config: &ForecastConfig,
) -> Result<Vec<ForecastPoint>> {
    let history = TrainingHistory::from_observations(observations)?;
    let resolved = config.resolve()?;

    // Last-timestamp lookup cannot fail: from_observations rejects empty input.
    let last = history.last_timestamp().ok_or_else(|| {
        ForesightError::InvalidInput("No data provided".into())
    })?;
    let future = future_axis(last, resolved.periods, resolved.freq)?;

    // Predict over history + future, matching the model's native axis.
    let mut axis = history.timestamps.clone();
    axis.extend_from_slice(&future);

    info!(
        model = model.name(),
        data_points = history.len(),
        periods = resolved.periods,
        freq = ?resolved.freq,
        "Running forecast"
    );

    let predictions = model.fit_predict(&history, &resolved.params, &axis)?;
    if predictions.yhat.len() != axis.len()
        || predictions.yhat_lower.len() != axis.len()
        || predictions.yhat_upper.len() != axis.len()
        || predictions.trend.len() != axis.len()
    {
        return Err(ForesightError::ModelError(format!(
            "prediction rows ({}) do not match the requested axis ({})",
            predictions.yhat.len(),
            axis.len()
        )));
    }

    // The future steps are exactly the trailing `periods` rows.
    let skip = history.len();
    let points = future
        .iter()
        .enumerate()
        .map(|(i, ts)| ForecastPoint {
            ds: format_timestamp(*ts),
            yhat: predictions.yhat[skip + i],
            yhat_lower: predictions.yhat_lower[skip + i],
            yhat_upper: predictions.yhat_upper[skip + i],
            trend: predictions.trend[skip + i],
        })
        .collect();

    Ok(points)
}

/// Continue the timestamp axis `periods` steps past `last` at spacing `freq`.
fn future_axis(
    last: NaiveDateTime,
    periods: usize,
    freq: Frequency,
) -> Result<Vec<NaiveDateTime>> {
    let mut axis = Vec::with_capacity(periods);
    let mut current = last;
    for _ in 0..periods {
        current = freq.advance(current)?;
        axis.push(current);
    }
    Ok(axis)
}
