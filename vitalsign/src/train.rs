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

//! One-shot batch training: load, preprocess, split, fit both models,
//! report held-out metrics, persist every artifact.

use std::path::PathBuf;

use log::info;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::algorithms::{LinearRegression, RandomForest};
use crate::artifacts::ArtifactStore;
use crate::data::error::DataError;
use crate::data::load_records;
use crate::encoding::LabelEncoder;
use crate::errors::PipelineError;
use crate::metrics::{mean_absolute_error, mean_squared_error, r2_score, root_mean_squared_error};
use crate::preprocess::preprocess;

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    data_path: PathBuf,
    artifacts_dir: PathBuf,
    test_ratio: f64,
    seed: u64,
    learning_rate: f64,
    epochs: usize,
    n_trees: usize,
}

impl TrainConfig {
    pub fn new<P: Into<PathBuf>>(data_path: P) -> Self {
        TrainConfig {
            data_path: data_path.into(),
            artifacts_dir: PathBuf::from("models"),
            test_ratio: 0.2,
            seed: 42,
            learning_rate: 0.01,
            epochs: 1000,
            n_trees: 100,
        }
    }

    pub fn with_artifacts_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees.max(1);
        self
    }
}

/// Held-out metrics for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelReport {
    pub r2: f64,
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub linear: ModelReport,
    pub forest: ModelReport,
    pub n_train: usize,
    pub n_test: usize,
}

/// Reproducible shuffle split: the same seed always yields the same
/// partition.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_ratio: f64,
    rng: &mut StdRng,
) -> Result<(Array2<f64>, Array1<f64>, Array2<f64>, Array1<f64>), PipelineError> {
    let n_samples = x.nrows();
    let n_test = (n_samples as f64 * test_ratio).round() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(PipelineError::InsufficientData { n_samples });
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);
    let (test_indices, train_indices) = indices.split_at(n_test);

    Ok((
        x.select(Axis(0), train_indices),
        y.select(Axis(0), train_indices),
        x.select(Axis(0), test_indices),
        y.select(Axis(0), test_indices),
    ))
}

fn evaluate(
    name: &str,
    predictions: &Array1<f64>,
    actuals: &Array1<f64>,
) -> Result<ModelReport, PipelineError> {
    let r2 = r2_score(predictions, actuals)?;
    let mae = mean_absolute_error(predictions, actuals)?;
    let mse = mean_squared_error(predictions, actuals)?;
    let rmse = root_mean_squared_error(predictions, actuals)?;

    info!("{name} performance: R2 = {r2:.3}, MAE = {mae:.3}, MSE = {mse:.3}, RMSE = {rmse:.3}");
    Ok(ModelReport { r2, mae, mse, rmse })
}

/// Runs the full training pipeline and persists the artifact set.
pub fn run_training(config: &TrainConfig) -> Result<TrainingSummary, PipelineError> {
    info!("Starting training run with config: {config:?}");

    let records = load_records(&config.data_path).map_err(DataError::Csv)?;
    let prepared = preprocess(&records)?;

    // The encoder sees the full target vector so every category present in
    // the dataset gets a code, regardless of how the split falls.
    let encoder = LabelEncoder::fit(&prepared.labels)?;
    let y = encoder.encode_all(&prepared.labels)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (x_train, y_train, x_test, y_test) =
        train_test_split(&prepared.features, &y, config.test_ratio, &mut rng)?;
    info!("Split {} training / {} held-out rows", x_train.nrows(), x_test.nrows());

    let mut linear = LinearRegression::new().build();
    linear.fit(&x_train, &y_train, config.learning_rate, config.epochs)?;
    let linear_report = evaluate("Linear regression", &linear.predict(&x_test)?, &y_test)?;

    let mut forest = RandomForest::new().n_trees(config.n_trees).seed(config.seed).build();
    forest.fit(&x_train, &y_train)?;
    let forest_report = evaluate("Random forest", &forest.predict(&x_test)?, &y_test)?;

    let store = ArtifactStore::new(&config.artifacts_dir);
    store.save_all(&prepared.scaler, &prepared.schema, &encoder, &linear, &forest)?;

    Ok(TrainingSummary {
        linear: linear_report,
        forest: forest_report,
        n_train: x_train.nrows(),
        n_test: x_test.nrows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{
        COLUMNS_FILE, ENCODER_FILE, FOREST_MODEL_FILE, LINEAR_MODEL_FILE, SCALER_FILE,
    };
    use crate::features::RawInput;
    use crate::predict::{ModelKind, Predictor};
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_split_is_reproducible() {
        let x = Array2::from_shape_vec((10, 1), (0..10).map(|i| i as f64).collect()).unwrap();
        let y = Array1::from_iter((0..10).map(|i| i as f64));

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let (xa_train, ya_train, xa_test, ya_test) =
            train_test_split(&x, &y, 0.2, &mut rng_a).unwrap();
        let (xb_train, yb_train, xb_test, yb_test) =
            train_test_split(&x, &y, 0.2, &mut rng_b).unwrap();

        assert_eq!(xa_train, xb_train);
        assert_eq!(ya_train, yb_train);
        assert_eq!(xa_test, xb_test);
        assert_eq!(ya_test, yb_test);
        assert_eq!(xa_test.nrows(), 2);
        assert_eq!(xa_train.nrows(), 8);
    }

    #[test]
    fn test_split_rejects_degenerate_partitions() {
        let x = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let y = array![1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(0);

        assert!(matches!(
            train_test_split(&x, &y, 0.0, &mut rng),
            Err(PipelineError::InsufficientData { n_samples: 3 })
        ));
        assert!(matches!(
            train_test_split(&x, &y, 1.0, &mut rng),
            Err(PipelineError::InsufficientData { n_samples: 3 })
        ));
    }

    fn write_survey_csv(n_rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Age,SleepHours,TeaCoffeePerDay,ExerciseDays,HealthyMeals,MealsPerDay,HealthStatus"
        )
        .unwrap();
        for i in 0..n_rows {
            let age = 20 + (i * 7) % 40;
            let sleep = 4 + i % 5;
            let tea = i % 4;
            let exercise = i % 7;
            let healthy = i % 3;
            let meals = 2 + i % 3;
            let label = if exercise >= 4 && sleep >= 6 {
                "Good"
            } else if exercise <= 1 {
                "Poor"
            } else {
                "Average"
            };
            writeln!(file, "{age},{sleep},{tea},{exercise},{healthy},{meals},{label}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_training_writes_full_artifact_set() {
        let data = write_survey_csv(40);
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::new(data.path())
            .with_artifacts_dir(dir.path())
            .with_epochs(200)
            .with_n_trees(10);

        run_training(&config).unwrap();

        for file in [SCALER_FILE, COLUMNS_FILE, ENCODER_FILE, LINEAR_MODEL_FILE, FOREST_MODEL_FILE]
        {
            assert!(dir.path().join(file).exists(), "Missing artifact {file}");
        }
    }

    #[test]
    fn test_same_seed_reproduces_metrics() {
        let data = write_survey_csv(40);
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();

        let config_a = TrainConfig::new(data.path())
            .with_artifacts_dir(dir_a.path())
            .with_epochs(200)
            .with_n_trees(10);
        let config_b = config_a.clone().with_artifacts_dir(dir_b.path());

        let summary_a = run_training(&config_a).unwrap();
        let summary_b = run_training(&config_b).unwrap();

        assert_eq!(summary_a, summary_b);
    }

    #[test]
    fn test_trained_artifacts_predict_known_categories() {
        let data = write_survey_csv(40);
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig::new(data.path())
            .with_artifacts_dir(dir.path())
            .with_epochs(200)
            .with_n_trees(10);
        run_training(&config).unwrap();

        let artifacts = ArtifactStore::new(dir.path()).load_artifacts().unwrap();
        let classes: Vec<String> = artifacts.encoder.classes().to_vec();
        let predictor = Predictor::new(artifacts);

        let input = RawInput {
            age: Some(30.0),
            sleep_hours: Some(6.0),
            tea_coffee_per_day: Some(2.0),
            exercise_days: Some(3.0),
            healthy_meals: Some(2.0),
            meals_per_day: Some(3.0),
        };
        for kind in [ModelKind::Linear, ModelKind::Forest] {
            let label = predictor.predict(&input, kind).unwrap();
            assert!(classes.contains(&label), "Prediction {label} not in {classes:?}");
        }
    }

    #[test]
    fn test_missing_dataset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            TrainConfig::new(dir.path().join("absent.csv")).with_artifacts_dir(dir.path());
        assert!(matches!(run_training(&config), Err(PipelineError::Data(_))));
    }
}
