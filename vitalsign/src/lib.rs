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

//! HealthStatus prediction from lifestyle surveys.
//!
//! Two phases share one feature-preparation contract: an offline trainer
//! cleans the survey dataset, derives ratio features, fits a scaler and two
//! regressors, and persists every artifact; an online predictor rebuilds a
//! single feature row from a raw record with the same rules and decodes the
//! model output back into a label. The `server` module exposes the predictor
//! over a minimal HTTP API.

pub mod algorithms;
pub mod artifacts;
pub mod data;
pub mod encoding;
pub mod errors;
pub mod features;
pub mod metrics;
pub mod optimizers;
pub mod predict;
pub mod preprocess;
pub mod scalers;
pub mod server;
pub mod train;

pub use ndarray;

/// Commonly used types.
pub mod prelude {
    pub use crate::artifacts::{ArtifactStore, Artifacts};
    pub use crate::errors::{PipelineError, PredictError};
    pub use crate::features::{FeatureSchema, RawInput};
    pub use crate::predict::{ModelKind, Predictor};
    pub use crate::train::{run_training, TrainConfig, TrainingSummary};
}
