use augurs::prophet::{
    wasmstan::WasmstanOptimizer, PredictionData, Prophet, ProphetOptions, SeasonalityOption,
    TrainingData,
};
use chrono::NaiveDateTime;
use foresight_core::{
    ForecastModel, ForesightError, ModelParams, ModelPredictions, Result, TrainingHistory,
};
use tracing::debug;

/// Prophet decomposable additive model, MAP-fitted with the
/// WASM-compiled Stan optimizer.
///
/// A fresh model instance is built per `fit_predict` call; nothing is
/// retained between invocations.
pub struct ProphetModel;

impl ProphetModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProphetModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastModel for ProphetModel {
    fn name(&self) -> &str {
        "Prophet"
    }

    fn fit_predict(
        &mut self,
        history: &TrainingHistory,
        params: &ModelParams,
        prediction_ds: &[NaiveDateTime],
    ) -> Result<ModelPredictions> {
        let opts = ProphetOptions {
            changepoint_prior_scale: params
                .changepoint_prior_scale
                .try_into()
                .map_err(|e| ForesightError::ConfigError(format!("changepoint_prior_scale: {e}")))?,
            seasonality_prior_scale: params
                .seasonality_prior_scale
                .try_into()
                .map_err(|e| ForesightError::ConfigError(format!("seasonality_prior_scale: {e}")))?,
            yearly_seasonality: SeasonalityOption::Manual(params.yearly_seasonality),
            weekly_seasonality: SeasonalityOption::Manual(params.weekly_seasonality),
            daily_seasonality: SeasonalityOption::Manual(params.daily_seasonality),
            ..Default::default()
        };

        let ds: Vec<i64> = history
            .timestamps
            .iter()
            .map(|ts| ts.and_utc().timestamp())
            .collect();
        let data = TrainingData::new(ds, history.values.clone())
            .map_err(|e| ForesightError::ModelError(format!("Prophet training data: {e}")))?;

        debug!(
            data_points = history.len(),
            prediction_points = prediction_ds.len(),
            "Prophet fitting"
        );

        let mut prophet = Prophet::new(opts, WasmstanOptimizer::new());
        prophet
            .fit(data, Default::default())
            .map_err(|e| ForesightError::ModelError(format!("Prophet fit: {e}")))?;

        let future: Vec<i64> = prediction_ds
            .iter()
            .map(|ts| ts.and_utc().timestamp())
            .collect();
        let predictions = prophet
            .predict(PredictionData::new(future))
            .map_err(|e| ForesightError::ModelError(format!("Prophet predict: {e}")))?;

        let yhat = predictions.yhat.point;
        // Bounds are present whenever uncertainty sampling is on (the
        // default); degrade to the point forecast otherwise.
        let yhat_lower = predictions.yhat.lower.unwrap_or_else(|| yhat.clone());
        let yhat_upper = predictions.yhat.upper.unwrap_or_else(|| yhat.clone());

        Ok(ModelPredictions {
            yhat_lower,
            yhat_upper,
            trend: predictions.trend.point,
            yhat,
        })
    }
}
