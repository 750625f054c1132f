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

//! Held-out regression metrics reported by the trainer.

use ndarray::Array1;

use crate::errors::MetricError;

fn validate(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<(), MetricError> {
    if predictions.is_empty() || actuals.is_empty() {
        return Err(MetricError::EmptyInput);
    }
    if predictions.len() != actuals.len() {
        return Err(MetricError::DimensionMismatch {
            expected: predictions.len(),
            actual: actuals.len(),
        });
    }
    if predictions.iter().any(|&v| !v.is_finite()) || actuals.iter().any(|&v| !v.is_finite()) {
        return Err(MetricError::InvalidNumericValue);
    }
    Ok(())
}

pub fn mean_squared_error(
    predictions: &Array1<f64>,
    actuals: &Array1<f64>,
) -> Result<f64, MetricError> {
    validate(predictions, actuals)?;
    let diff = predictions - actuals;
    diff.mapv(|x| x * x).mean().ok_or(MetricError::EmptyInput)
}

pub fn root_mean_squared_error(
    predictions: &Array1<f64>,
    actuals: &Array1<f64>,
) -> Result<f64, MetricError> {
    Ok(mean_squared_error(predictions, actuals)?.sqrt())
}

pub fn mean_absolute_error(
    predictions: &Array1<f64>,
    actuals: &Array1<f64>,
) -> Result<f64, MetricError> {
    validate(predictions, actuals)?;
    let diff = predictions - actuals;
    diff.mapv(f64::abs).mean().ok_or(MetricError::EmptyInput)
}

/// Coefficient of determination on held-out data.
///
/// When the actuals are constant the ratio is undefined; the score is then
/// 1 for exact predictions and 0 otherwise instead of dividing by zero.
pub fn r2_score(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<f64, MetricError> {
    validate(predictions, actuals)?;
    let mean = actuals.mean().ok_or(MetricError::EmptyInput)?;
    let ss_tot = actuals.mapv(|y| (y - mean) * (y - mean)).sum();
    let ss_res = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(&p, &y)| (y - p) * (y - p))
        .sum::<f64>();
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_predictions() {
        let predictions = array![1.0, 2.0, 3.0];
        let actuals = array![1.0, 2.0, 3.0];

        assert_eq!(mean_squared_error(&predictions, &actuals).unwrap(), 0.0);
        assert_eq!(root_mean_squared_error(&predictions, &actuals).unwrap(), 0.0);
        assert_eq!(mean_absolute_error(&predictions, &actuals).unwrap(), 0.0);
        assert_eq!(r2_score(&predictions, &actuals).unwrap(), 1.0);
    }

    #[test]
    fn test_mse_known_value() {
        let predictions = array![1.0, 2.0, 3.0];
        let actuals = array![1.1, 2.1, 3.1];
        let mse = mean_squared_error(&predictions, &actuals).unwrap();
        assert!((mse - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_mae_known_value() {
        let predictions = array![1.0, 3.0];
        let actuals = array![2.0, 1.0];
        let mae = mean_absolute_error(&predictions, &actuals).unwrap();
        assert!((mae - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_r2_mean_predictor_is_zero() {
        let actuals = array![1.0, 2.0, 3.0];
        let predictions = array![2.0, 2.0, 2.0];
        let r2 = r2_score(&predictions, &actuals).unwrap();
        assert!(r2.abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_actuals() {
        let actuals = array![3.0, 3.0];
        assert_eq!(r2_score(&array![1.0, 2.0], &actuals).unwrap(), 0.0);
        assert_eq!(r2_score(&array![3.0, 3.0], &actuals).unwrap(), 1.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let predictions = array![1.0, 2.0];
        let actuals = array![1.0, 2.0, 3.0];
        let result = mean_squared_error(&predictions, &actuals);
        assert!(matches!(result, Err(MetricError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn test_nan_rejected() {
        let predictions = array![1.0, f64::NAN];
        let actuals = array![1.0, 2.0];
        assert!(matches!(
            mean_absolute_error(&predictions, &actuals),
            Err(MetricError::InvalidNumericValue)
        ));
    }

    #[test]
    fn test_empty_input() {
        let predictions = Array1::<f64>::zeros(0);
        let actuals = array![1.0];
        assert!(matches!(mean_squared_error(&predictions, &actuals), Err(MetricError::EmptyInput)));
    }
}
