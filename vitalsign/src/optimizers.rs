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

use ndarray::{Array1, Array2};

use crate::errors::OptimizerError;

/// Computes one gradient step for a weights-and-bias model.
pub trait Optimizer {
    fn compute_gradients(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &Array1<f64>,
        bias: f64,
    ) -> Result<(Array1<f64>, f64), OptimizerError>;
}

/// Full-batch gradient of the squared error for a linear predictor.
pub struct BatchGradientDescent;

impl Optimizer for BatchGradientDescent {
    fn compute_gradients(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        weights: &Array1<f64>,
        bias: f64,
    ) -> Result<(Array1<f64>, f64), OptimizerError> {
        if x.is_empty() || y.is_empty() {
            return Err(OptimizerError::EmptyInput);
        }
        if x.ncols() != weights.len() {
            return Err(OptimizerError::DimensionMismatch {
                expected: x.ncols(),
                actual: weights.len(),
            });
        }
        if x.nrows() != y.len() {
            return Err(OptimizerError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }

        let predictions = x.dot(weights) + bias;
        let errors = &predictions - y;
        let grad_weights = x.t().dot(&errors) / x.nrows() as f64;
        let grad_bias = errors.mean().ok_or(OptimizerError::NumericalInstability)?;

        if !grad_weights.iter().all(|&v| v.is_finite()) || !grad_bias.is_finite() {
            return Err(OptimizerError::NumericalInstability);
        }

        Ok((grad_weights, grad_bias))
    }
}
