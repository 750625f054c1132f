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

//! Single-record inference against the persisted artifact set.

use ndarray::Axis;

use crate::artifacts::Artifacts;
use crate::errors::PredictError;
use crate::features::RawInput;

/// Which trained model answers a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Linear,
    Forest,
}

impl ModelKind {
    /// Parses the request selector. Matching is case-insensitive.
    pub fn parse(selector: &str) -> Option<Self> {
        match selector.to_ascii_lowercase().as_str() {
            "lr" => Some(ModelKind::Linear),
            "rf" => Some(ModelKind::Forest),
            _ => None,
        }
    }

    /// The model name echoed in API responses.
    pub fn response_name(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear_regression",
            ModelKind::Forest => "random_forest",
        }
    }
}

/// Rebuilds a feature row from one raw record and asks the selected model
/// for a decoded label.
///
/// The predictor holds the loaded artifacts immutably and performs a pure
/// computation per call: same input and artifacts, same answer.
pub struct Predictor {
    artifacts: Artifacts,
}

impl Predictor {
    pub fn new(artifacts: Artifacts) -> Self {
        Predictor { artifacts }
    }

    pub fn predict(&self, input: &RawInput, kind: ModelKind) -> Result<String, PredictError> {
        let Artifacts { schema, scaler, encoder, linear, forest } = &self.artifacts;

        let fitted_width = scaler.n_features().unwrap_or(0);
        if fitted_width != schema.len() {
            return Err(PredictError::SchemaMismatch {
                expected: schema.len(),
                actual: fitted_width,
            });
        }

        let row = schema.assemble_row(input).insert_axis(Axis(0));
        let scaled = scaler.transform(&row)?;

        let value = match kind {
            ModelKind::Linear => linear.predict(&scaled)?[0],
            ModelKind::Forest => forest.predict(&scaled)?[0],
        };
        if !value.is_finite() {
            return Err(PredictError::NonFinitePrediction(value));
        }

        let label = encoder.decode(value as i64)?;
        Ok(label.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{LinearRegression, RandomForest, TreeNode};
    use crate::encoding::LabelEncoder;
    use crate::features::FeatureSchema;
    use crate::scalers::StandardScaler;
    use ndarray::Array1;

    fn identity_artifacts(linear_bias: f64, forest_leaf: f64) -> Artifacts {
        let schema = FeatureSchema::training_order();
        let n = schema.len();
        Artifacts {
            schema,
            scaler: StandardScaler::from_parameters(Array1::zeros(n), Array1::ones(n)),
            encoder: LabelEncoder::fit(&[
                "Good".to_string(),
                "Average".to_string(),
                "Poor".to_string(),
            ])
            .unwrap(),
            linear: LinearRegression::from_parameters(Array1::zeros(n), linear_bias),
            forest: RandomForest::from_trees(
                vec![TreeNode::Leaf { prediction: forest_leaf }],
                n,
            ),
        }
    }

    fn sample_input() -> RawInput {
        RawInput {
            age: Some(30.0),
            sleep_hours: Some(6.0),
            tea_coffee_per_day: Some(2.0),
            exercise_days: Some(3.0),
            healthy_meals: Some(2.0),
            meals_per_day: Some(3.0),
        }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(ModelKind::parse("lr"), Some(ModelKind::Linear));
        assert_eq!(ModelKind::parse("RF"), Some(ModelKind::Forest));
        assert_eq!(ModelKind::parse("zz"), None);
        assert_eq!(ModelKind::parse(""), None);
    }

    #[test]
    fn test_prediction_decodes_label() {
        // Codes: Average = 0, Good = 1, Poor = 2.
        let predictor = Predictor::new(identity_artifacts(1.0, 2.0));

        assert_eq!(predictor.predict(&sample_input(), ModelKind::Linear).unwrap(), "Good");
        assert_eq!(predictor.predict(&sample_input(), ModelKind::Forest).unwrap(), "Poor");
    }

    #[test]
    fn test_fractional_output_truncates() {
        let predictor = Predictor::new(identity_artifacts(1.9, 0.0));
        assert_eq!(predictor.predict(&sample_input(), ModelKind::Linear).unwrap(), "Good");
    }

    #[test]
    fn test_out_of_range_output_is_error() {
        let predictor = Predictor::new(identity_artifacts(5.0, 0.0));
        let err = predictor.predict(&sample_input(), ModelKind::Linear).unwrap_err();
        assert!(matches!(err, PredictError::Encoder(_)), "Unexpected error: {err}");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let predictor = Predictor::new(identity_artifacts(0.0, 0.0));
        assert_eq!(predictor.predict(&RawInput::default(), ModelKind::Linear).unwrap(), "Average");
    }

    #[test]
    fn test_repeated_predictions_identical() {
        let predictor = Predictor::new(identity_artifacts(1.0, 2.0));
        let first = predictor.predict(&sample_input(), ModelKind::Forest).unwrap();
        for _ in 0..10 {
            assert_eq!(predictor.predict(&sample_input(), ModelKind::Forest).unwrap(), first);
        }
    }

    #[test]
    fn test_schema_scaler_width_mismatch() {
        let mut artifacts = identity_artifacts(0.0, 0.0);
        artifacts.scaler =
            StandardScaler::from_parameters(Array1::zeros(3), Array1::ones(3));
        let predictor = Predictor::new(artifacts);

        let err = predictor.predict(&sample_input(), ModelKind::Linear).unwrap_err();
        assert!(matches!(err, PredictError::SchemaMismatch { expected: 9, actual: 3 }));
    }
}
