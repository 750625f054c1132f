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

//! Persistence for everything inference needs: scaler statistics, the
//! canonical column list, the label encoder, and both trained models.
//!
//! All artifacts are written once by the trainer and loaded read-only at
//! server startup. One consistently named file set, JSON throughout.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use ndarray::Array1;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::algorithms::{LinearRegression, RandomForest, TreeNode};
use crate::encoding::LabelEncoder;
use crate::errors::ArtifactError;
use crate::features::FeatureSchema;
use crate::scalers::StandardScaler;

pub const SCALER_FILE: &str = "health_scaler.json";
pub const COLUMNS_FILE: &str = "train_columns.json";
pub const ENCODER_FILE: &str = "label_encoder.json";
pub const LINEAR_MODEL_FILE: &str = "lr_model.json";
pub const FOREST_MODEL_FILE: &str = "rf_model.json";

#[derive(Serialize, Deserialize)]
struct SavedScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct SavedLinearModel {
    weights: Vec<f64>,
    bias: f64,
}

#[derive(Serialize, Deserialize)]
struct SavedForestModel {
    n_features: usize,
    trees: Vec<TreeNode>,
}

/// Every artifact the serving process needs, loaded in one pass.
#[derive(Debug)]
pub struct Artifacts {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub encoder: LabelEncoder,
    pub linear: LinearRegression,
    pub forest: RandomForest,
}

/// A directory of artifact files with fixed names.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ArtifactStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), ArtifactError> {
        let path = self.dir.join(file);
        let json = serde_json::to_string(value)
            .map_err(|source| ArtifactError::Json { path: path.clone(), source })?;
        fs::write(&path, json).map_err(|source| ArtifactError::Io { path, source })
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, ArtifactError> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path)
            .map_err(|source| ArtifactError::Io { path: path.clone(), source })?;
        serde_json::from_str(&json).map_err(|source| ArtifactError::Json { path, source })
    }

    pub fn save_scaler(&self, scaler: &StandardScaler) -> Result<(), ArtifactError> {
        let mean = scaler.mean().ok_or(ArtifactError::Unfitted("scaler"))?;
        let std = scaler.std().ok_or(ArtifactError::Unfitted("scaler"))?;
        self.write_json(SCALER_FILE, &SavedScaler { mean: mean.to_vec(), std: std.to_vec() })
    }

    pub fn load_scaler(&self) -> Result<StandardScaler, ArtifactError> {
        let saved: SavedScaler = self.read_json(SCALER_FILE)?;
        Ok(StandardScaler::from_parameters(
            Array1::from_vec(saved.mean),
            Array1::from_vec(saved.std),
        ))
    }

    pub fn save_schema(&self, schema: &FeatureSchema) -> Result<(), ArtifactError> {
        self.write_json(COLUMNS_FILE, schema)
    }

    pub fn load_schema(&self) -> Result<FeatureSchema, ArtifactError> {
        self.read_json(COLUMNS_FILE)
    }

    pub fn save_encoder(&self, encoder: &LabelEncoder) -> Result<(), ArtifactError> {
        self.write_json(ENCODER_FILE, encoder)
    }

    pub fn load_encoder(&self) -> Result<LabelEncoder, ArtifactError> {
        self.read_json(ENCODER_FILE)
    }

    pub fn save_linear(&self, model: &LinearRegression) -> Result<(), ArtifactError> {
        let weights = model.weights().ok_or(ArtifactError::Unfitted("linear model"))?;
        self.write_json(
            LINEAR_MODEL_FILE,
            &SavedLinearModel { weights: weights.to_vec(), bias: model.bias() },
        )
    }

    pub fn load_linear(&self) -> Result<LinearRegression, ArtifactError> {
        let saved: SavedLinearModel = self.read_json(LINEAR_MODEL_FILE)?;
        Ok(LinearRegression::from_parameters(Array1::from_vec(saved.weights), saved.bias))
    }

    pub fn save_forest(&self, model: &RandomForest) -> Result<(), ArtifactError> {
        let n_features = model.n_features().ok_or(ArtifactError::Unfitted("random forest"))?;
        self.write_json(
            FOREST_MODEL_FILE,
            &SavedForestModel { n_features, trees: model.trees().to_vec() },
        )
    }

    pub fn load_forest(&self) -> Result<RandomForest, ArtifactError> {
        let saved: SavedForestModel = self.read_json(FOREST_MODEL_FILE)?;
        Ok(RandomForest::from_trees(saved.trees, saved.n_features))
    }

    /// Writes the complete artifact set, creating the directory if needed.
    pub fn save_all(
        &self,
        scaler: &StandardScaler,
        schema: &FeatureSchema,
        encoder: &LabelEncoder,
        linear: &LinearRegression,
        forest: &RandomForest,
    ) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir)
            .map_err(|source| ArtifactError::Io { path: self.dir.clone(), source })?;
        self.save_scaler(scaler)?;
        self.save_schema(schema)?;
        self.save_encoder(encoder)?;
        self.save_linear(linear)?;
        self.save_forest(forest)?;
        info!("Saved artifacts to {}", self.dir.display());
        Ok(())
    }

    /// Loads the complete artifact set for serving. Any missing or corrupt
    /// file fails the whole load.
    pub fn load_artifacts(&self) -> Result<Artifacts, ArtifactError> {
        let artifacts = Artifacts {
            schema: self.load_schema()?,
            scaler: self.load_scaler()?,
            encoder: self.load_encoder()?,
            linear: self.load_linear()?,
            forest: self.load_forest()?,
        };
        info!("Loaded artifacts from {}", self.dir.display());
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn fitted_scaler() -> StandardScaler {
        let x = Array2::from_shape_vec((3, 2), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).unwrap();
        scaler
    }

    fn fitted_forest() -> RandomForest {
        let x = Array2::from_shape_vec((4, 2), vec![1.0, 0.0, 2.0, 0.0, 8.0, 1.0, 9.0, 1.0])
            .unwrap();
        let y = array![0.0, 0.0, 2.0, 2.0];
        let mut forest = RandomForest::new().n_trees(5).seed(3).build();
        forest.fit(&x, &y).unwrap();
        forest
    }

    #[test]
    fn test_round_trip_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let scaler = fitted_scaler();
        let schema = FeatureSchema::training_order();
        let encoder = LabelEncoder::fit(&[
            "Good".to_string(),
            "Average".to_string(),
            "Poor".to_string(),
        ])
        .unwrap();
        let linear = LinearRegression::from_parameters(array![0.5, -0.5], 1.0);
        let forest = fitted_forest();

        store.save_all(&scaler, &schema, &encoder, &linear, &forest).unwrap();
        let loaded = store.load_artifacts().unwrap();

        assert_eq!(loaded.schema, schema);
        assert_eq!(loaded.encoder, encoder);
        assert_eq!(loaded.scaler.mean().unwrap(), scaler.mean().unwrap());
        assert_eq!(loaded.scaler.std().unwrap(), scaler.std().unwrap());
        assert_eq!(loaded.linear.weights().unwrap(), linear.weights().unwrap());
        assert_eq!(loaded.linear.bias(), linear.bias());
        assert_eq!(loaded.forest.trees(), forest.trees());
        assert_eq!(loaded.forest.n_features(), forest.n_features());
    }

    #[test]
    fn test_load_from_empty_dir_names_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.load_artifacts().unwrap_err();
        assert!(err.to_string().contains(COLUMNS_FILE), "Unexpected error: {err}");
    }

    #[test]
    fn test_corrupt_artifact_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::write(dir.path().join(COLUMNS_FILE), "not json").unwrap();

        let err = store.load_schema().unwrap_err();
        assert!(matches!(err, ArtifactError::Json { .. }));
    }

    #[test]
    fn test_unfitted_models_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let unfitted = LinearRegression::new().build();
        assert!(matches!(store.save_linear(&unfitted), Err(ArtifactError::Unfitted(_))));

        let scaler = StandardScaler::new();
        assert!(matches!(store.save_scaler(&scaler), Err(ArtifactError::Unfitted(_))));
    }
}
