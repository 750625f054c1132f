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

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Input contains a non-finite value")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Gradient computation produced a non-finite value")]
    NumericalInstability,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Input data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum MetricError {
    #[error("Input data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains a non-finite value")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Cannot fit an encoder on an empty label set")]
    EmptyInput,

    #[error("Unknown label '{0}'")]
    UnknownLabel(String),

    #[error("Encoded value {code} is outside the trained range 0..{n_classes}")]
    CodeOutOfRange { code: i64, n_classes: usize },
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to access artifact {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to decode artifact {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("Cannot persist an unfitted {0}")]
    Unfitted(&'static str),
}

/// Errors raised by the offline training pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Data error: {0}")]
    Data(#[from] crate::data::error::DataError),

    #[error("No usable rows remain after cleaning")]
    EmptyDataset,

    #[error("Not enough samples to split: {n_samples}")]
    InsufficientData { n_samples: usize },

    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Errors raised while turning a raw record into a decoded prediction.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Schema expects {expected} columns but scaler was fitted on {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Model produced a non-finite prediction: {0}")]
    NonFinitePrediction(f64),
}
