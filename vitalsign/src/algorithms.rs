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
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::optimizers::{BatchGradientDescent, Optimizer};

pub struct LinearRegressionBuilder {
    optimizer: Box<dyn Optimizer + Send + Sync>,
}

impl LinearRegressionBuilder {
    pub fn optimizer(mut self, optimizer: impl Optimizer + Send + Sync + 'static) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    pub fn build(self) -> LinearRegression {
        LinearRegression { weights: None, bias: 0.0, optimizer: self.optimizer }
    }
}

/// Linear regressor trained by full-batch gradient descent.
///
/// Weights start at zero, so training is deterministic for a given dataset,
/// learning rate and epoch count. Inputs are expected to be scaled already;
/// the model applies no normalization of its own.
pub struct LinearRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    optimizer: Box<dyn Optimizer + Send + Sync>,
}

impl std::fmt::Debug for LinearRegression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearRegression")
            .field("weights", &self.weights)
            .field("bias", &self.bias)
            .finish()
    }
}

impl LinearRegression {
    pub fn new() -> LinearRegressionBuilder {
        LinearRegressionBuilder { optimizer: Box::new(BatchGradientDescent) }
    }

    /// Rebuilds a fitted model from persisted parameters.
    pub fn from_parameters(weights: Array1<f64>, bias: f64) -> Self {
        LinearRegression {
            weights: Some(weights),
            bias,
            optimizer: Box::new(BatchGradientDescent),
        }
    }

    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        learning_rate: f64,
        epochs: usize,
    ) -> Result<(), ModelError> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }

        let mut weights = Array1::zeros(x.ncols());
        let mut bias = 0.0;
        for _ in 0..epochs {
            let (grad_weights, grad_bias) =
                self.optimizer.compute_gradients(x, y, &weights, bias)?;
            weights = weights - &(grad_weights * learning_rate);
            bias -= grad_bias * learning_rate;
        }

        self.weights = Some(weights);
        self.bias = bias;
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(weights) + self.bias)
    }

    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

/// One node of a fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Internal { feature: usize, threshold: f64, left: Box<TreeNode>, right: Box<TreeNode> },
    Leaf { prediction: f64 },
}

pub struct RandomForestBuilder {
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    sample_size: Option<usize>,
    seed: u64,
}

impl RandomForestBuilder {
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees.max(1);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    /// Bootstrap sample size per tree; defaults to the full dataset.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size.max(1));
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> RandomForest {
        RandomForest {
            trees: Vec::new(),
            n_features: None,
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            sample_size: self.sample_size,
            seed: self.seed,
        }
    }
}

/// Ensemble of variance-split regression trees, each fitted on a bootstrap
/// sample. Predictions average the tree outputs. Bootstrap sampling draws
/// from a seeded RNG, so a fit is reproducible for a given seed.
#[derive(Debug)]
pub struct RandomForest {
    trees: Vec<TreeNode>,
    n_features: Option<usize>,
    n_trees: usize,
    max_depth: usize,
    min_samples_split: usize,
    sample_size: Option<usize>,
    seed: u64,
}

impl RandomForest {
    pub fn new() -> RandomForestBuilder {
        RandomForestBuilder {
            n_trees: 100,
            max_depth: 16,
            min_samples_split: 2,
            sample_size: None,
            seed: 42,
        }
    }

    /// Rebuilds a fitted forest from persisted trees.
    pub fn from_trees(trees: Vec<TreeNode>, n_features: usize) -> Self {
        RandomForest {
            n_trees: trees.len().max(1),
            trees,
            n_features: Some(n_features),
            max_depth: 16,
            min_samples_split: 2,
            sample_size: None,
            seed: 42,
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch { expected: x.nrows(), actual: y.len() });
        }

        let n_samples = x.nrows();
        let sample_size = self.sample_size.unwrap_or(n_samples);
        let mut rng = StdRng::seed_from_u64(self.seed);

        self.trees.clear();
        for _ in 0..self.n_trees {
            let indices: Vec<usize> =
                (0..sample_size).map(|_| rng.gen_range(0..n_samples)).collect();
            self.trees.push(self.build_tree(x, y, indices, 0));
        }
        self.n_features = Some(x.ncols());
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let n_features = self.n_features.ok_or(ModelError::NotFitted)?;
        if self.trees.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != n_features {
            return Err(ModelError::DimensionMismatch { expected: n_features, actual: x.ncols() });
        }

        let mut predictions = Vec::with_capacity(x.nrows());
        for row in x.outer_iter() {
            let row = row.to_owned();
            let sum: f64 = self.trees.iter().map(|tree| predict_row(&row, tree)).sum();
            predictions.push(sum / self.trees.len() as f64);
        }
        Ok(Array1::from_vec(predictions))
    }

    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }

    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn build_tree(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: Vec<usize>,
        depth: usize,
    ) -> TreeNode {
        let n = indices.len() as f64;
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n;

        let homogeneous = indices.iter().all(|&i| (y[i] - y[indices[0]]).abs() < 1e-12);
        if depth >= self.max_depth || indices.len() < self.min_samples_split || homogeneous {
            return TreeNode::Leaf { prediction: mean };
        }

        let Some((feature, threshold)) = best_split(x, y, &indices) else {
            return TreeNode::Leaf { prediction: mean };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) =
            indices.into_iter().partition(|&i| x[[i, feature]] < threshold);
        if left_indices.is_empty() || right_indices.is_empty() {
            return TreeNode::Leaf { prediction: mean };
        }

        TreeNode::Internal {
            feature,
            threshold,
            left: Box::new(self.build_tree(x, y, left_indices, depth + 1)),
            right: Box::new(self.build_tree(x, y, right_indices, depth + 1)),
        }
    }
}

/// Finds the split minimizing the summed squared error of the two sides.
/// Thresholds are midpoints between adjacent distinct feature values, so a
/// returned split always separates the data.
fn best_split(x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<(usize, f64)> {
    let n = indices.len();
    if n < 2 {
        return None;
    }

    let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();

    let mut best: Option<(usize, f64, f64)> = None;
    for feature in 0..x.ncols() {
        let mut ordered: Vec<(f64, f64)> =
            indices.iter().map(|&i| (x[[i, feature]], y[i])).collect();
        ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for split in 1..n {
            let (prev_value, prev_target) = ordered[split - 1];
            left_sum += prev_target;
            left_sq += prev_target * prev_target;

            let value = ordered[split].0;
            if value == prev_value {
                continue;
            }

            let left_n = split as f64;
            let right_n = (n - split) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                best = Some((feature, (prev_value + value) / 2.0, sse));
            }
        }
    }
    best.map(|(feature, threshold, _)| (feature, threshold))
}

fn predict_row(row: &Array1<f64>, node: &TreeNode) -> f64 {
    let mut current = node;
    loop {
        match current {
            TreeNode::Leaf { prediction } => return *prediction,
            TreeNode::Internal { feature, threshold, left, right } => {
                current = if row[*feature] < *threshold { left } else { right };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_linear_regression_fit_predict() {
        let x_data = Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y_data = Array1::from_vec(vec![2.0, 4.0, 6.0, 8.0]);

        let mut model = LinearRegression::new().build();
        model.fit(&x_data, &y_data, 0.1, 1000).unwrap();

        let new_data = Array2::from_shape_vec((2, 1), vec![5.0, 6.0]).unwrap();
        let predictions = model.predict(&new_data).unwrap();

        assert!((predictions[0] - 10.0).abs() < 1e-2);
        assert!((predictions[1] - 12.0).abs() < 1e-2);
    }

    #[test]
    fn test_linear_regression_is_deterministic() {
        let x = Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = array![1.0, 3.0, 2.0, 5.0];

        let mut a = LinearRegression::new().build();
        let mut b = LinearRegression::new().build();
        a.fit(&x, &y, 0.05, 500).unwrap();
        b.fit(&x, &y, 0.05, 500).unwrap();

        assert_eq!(a.predict(&x).unwrap(), b.predict(&x).unwrap());
    }

    #[test]
    fn test_linear_regression_predict_before_fit() {
        let model = LinearRegression::new().build();
        let x = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        assert!(matches!(model.predict(&x), Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_linear_regression_width_mismatch() {
        let x = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = array![1.0, 2.0];
        let mut model = LinearRegression::new().build();
        model.fit(&x, &y, 0.01, 10).unwrap();

        let narrow = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        assert!(matches!(
            model.predict(&narrow),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_from_parameters_predicts() {
        let model = LinearRegression::from_parameters(array![2.0], 1.0);
        let x = Array2::from_shape_vec((2, 1), vec![1.0, 3.0]).unwrap();
        assert_eq!(model.predict(&x).unwrap(), array![3.0, 7.0]);
    }

    fn step_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (8, 1),
            vec![1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap();
        let y = array![0.0, 0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0];
        (x, y)
    }

    #[test]
    fn test_random_forest_learns_step_function() {
        let (x, y) = step_data();
        let mut model = RandomForest::new().n_trees(20).seed(7).build();
        model.fit(&x, &y).unwrap();

        let probe = Array2::from_shape_vec((2, 1), vec![1.5, 8.5]).unwrap();
        let predictions = model.predict(&probe).unwrap();

        assert!(predictions[0] < 0.5, "Expected low prediction, got {}", predictions[0]);
        assert!(predictions[1] > 1.5, "Expected high prediction, got {}", predictions[1]);
    }

    #[test]
    fn test_random_forest_same_seed_reproduces() {
        let (x, y) = step_data();
        let probe = Array2::from_shape_vec((3, 1), vec![2.5, 5.0, 7.5]).unwrap();

        let mut a = RandomForest::new().n_trees(10).seed(42).build();
        let mut b = RandomForest::new().n_trees(10).seed(42).build();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_random_forest_predict_before_fit() {
        let model = RandomForest::new().build();
        let x = Array2::from_shape_vec((1, 1), vec![1.0]).unwrap();
        assert!(matches!(model.predict(&x), Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_random_forest_from_trees() {
        let model = RandomForest::from_trees(vec![TreeNode::Leaf { prediction: 2.0 }], 3);
        let x = Array2::zeros((2, 3));
        assert_eq!(model.predict(&x).unwrap(), array![2.0, 2.0]);
    }

    #[test]
    fn test_best_split_separates_step() {
        let (x, y) = step_data();
        let indices: Vec<usize> = (0..x.nrows()).collect();
        let (feature, threshold) = best_split(&x, &y, &indices).unwrap();

        assert_eq!(feature, 0);
        assert!(threshold > 4.0 && threshold < 6.0, "Unexpected threshold {}", threshold);
    }

    #[test]
    fn test_best_split_constant_feature() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 1.0, 1.0]).unwrap();
        let y = array![1.0, 2.0, 3.0];
        let indices: Vec<usize> = (0..3).collect();
        assert_eq!(best_split(&x, &y, &indices), None);
    }
}
