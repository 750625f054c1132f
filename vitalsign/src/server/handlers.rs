// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! HTTP request handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use log::{debug, error};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::features::{RawInput, RAW_FIELDS};
use crate::predict::ModelKind;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Capability description served at the root.
pub async fn home() -> Json<Value> {
    Json(json!({
        "message": "HealthStatus Prediction API",
        "endpoints": {
            "POST /predict?model=lr|rf": {
                "expects_json": {
                    "Age": "number",
                    "SleepHours": "number",
                    "TeaCoffeePerDay": "number",
                    "ExerciseDays": "number",
                    "HealthyMeals": "number",
                    "MealsPerDay": "number"
                }
            }
        }
    }))
}

#[derive(Deserialize)]
pub struct PredictQuery {
    #[serde(default)]
    pub model: Option<String>,
}

/// Validates the selector and the required key set, then delegates to the
/// predictor. Validation failures are client errors; anything the predictor
/// raises is reported as an internal error with its message.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PredictQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let selector = query.model.unwrap_or_default().to_lowercase();
    let kind = ModelKind::parse(&selector).ok_or_else(|| {
        ServerError::BadRequest("Unknown model. Use model=lr or model=rf".to_string())
    })?;

    let missing: Vec<&str> =
        RAW_FIELDS.iter().filter(|field| body.get(**field).is_none()).copied().collect();
    if !missing.is_empty() {
        return Err(ServerError::BadRequest(format!("Missing fields: {missing:?}")));
    }

    let input: RawInput = serde_json::from_value(body.clone()).map_err(|e| {
        error!("Rejecting malformed record: {e}");
        ServerError::Internal(format!("Failed to prepare/predict: {e}"))
    })?;

    let prediction = state.predictor.predict(&input, kind).map_err(|e| {
        error!("Prediction failed: {e}");
        ServerError::Internal(format!("Failed to prepare/predict: {e}"))
    })?;
    debug!("Predicted {prediction} with {}", kind.response_name());

    let echoed: serde_json::Map<String, Value> = RAW_FIELDS
        .iter()
        .filter_map(|field| body.get(*field).map(|v| (field.to_string(), v.clone())))
        .collect();

    Ok(Json(json!({
        "model": kind.response_name(),
        "input": echoed,
        "prediction": prediction,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{LinearRegression, RandomForest, TreeNode};
    use crate::artifacts::Artifacts;
    use crate::encoding::LabelEncoder;
    use crate::features::FeatureSchema;
    use crate::predict::Predictor;
    use crate::scalers::StandardScaler;
    use ndarray::Array1;

    fn test_state() -> Arc<AppState> {
        let schema = FeatureSchema::training_order();
        let n = schema.len();
        let artifacts = Artifacts {
            schema,
            scaler: StandardScaler::from_parameters(Array1::zeros(n), Array1::ones(n)),
            encoder: LabelEncoder::fit(&[
                "Good".to_string(),
                "Average".to_string(),
                "Poor".to_string(),
            ])
            .unwrap(),
            linear: LinearRegression::from_parameters(Array1::zeros(n), 1.0),
            forest: RandomForest::from_trees(vec![TreeNode::Leaf { prediction: 0.0 }], n),
        };
        Arc::new(AppState { predictor: Predictor::new(artifacts) })
    }

    fn full_body() -> Value {
        json!({
            "Age": 30,
            "SleepHours": 6,
            "TeaCoffeePerDay": 2,
            "ExerciseDays": 3,
            "HealthyMeals": 2,
            "MealsPerDay": 3
        })
    }

    async fn call(state: Arc<AppState>, model: Option<&str>, body: Value) -> Result<Json<Value>> {
        predict(
            State(state),
            Query(PredictQuery { model: model.map(str::to_string) }),
            Json(body),
        )
        .await
    }

    #[tokio::test]
    async fn test_home_describes_required_fields() {
        let Json(body) = home().await;
        let expected = &body["endpoints"]["POST /predict?model=lr|rf"]["expects_json"];
        for field in RAW_FIELDS {
            assert!(expected.get(field).is_some(), "Missing field {field} in description");
        }
    }

    #[tokio::test]
    async fn test_unknown_model_is_bad_request() {
        let err = call(test_state(), Some("zz"), full_body()).await.unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
        let message = err.to_string();
        assert!(message.contains("lr") && message.contains("rf"), "Unexpected: {message}");
    }

    #[tokio::test]
    async fn test_missing_selector_is_bad_request() {
        let err = call(test_state(), None, full_body()).await.unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_field_is_listed() {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("Age");

        let err = call(test_state(), Some("lr"), body).await.unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
        assert!(err.to_string().contains("Age"), "Unexpected: {err}");
    }

    #[tokio::test]
    async fn test_successful_prediction_echoes_input() {
        let Json(response) = call(test_state(), Some("rf"), full_body()).await.unwrap();

        assert_eq!(response["model"], "random_forest");
        assert_eq!(response["prediction"], "Average");
        assert_eq!(response["input"]["Age"], 30);
        assert_eq!(response["input"].as_object().unwrap().len(), RAW_FIELDS.len());
    }

    #[tokio::test]
    async fn test_selector_is_case_insensitive() {
        let Json(response) = call(test_state(), Some("LR"), full_body()).await.unwrap();
        assert_eq!(response["model"], "linear_regression");
        assert_eq!(response["prediction"], "Good");
    }

    #[tokio::test]
    async fn test_non_numeric_field_is_internal_error() {
        let mut body = full_body();
        body.as_object_mut().unwrap().insert("Age".to_string(), json!("thirty"));

        let err = call(test_state(), Some("lr"), body).await.unwrap_err();
        assert!(matches!(err, ServerError::Internal(_)));
        assert!(err.to_string().contains("Failed to prepare/predict"), "Unexpected: {err}");
    }
}
