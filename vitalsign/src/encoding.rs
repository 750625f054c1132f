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

use std::collections::BTreeSet;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::errors::EncoderError;

/// Bijection between categorical labels and integer codes.
///
/// Classes are stored sorted, so the code assignment is deterministic for a
/// given label set. The encoder is fitted once on the full target vector and
/// persisted; the inverse mapping decodes model output back into a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit(labels: &[String]) -> Result<Self, EncoderError> {
        if labels.is_empty() {
            return Err(EncoderError::EmptyInput);
        }
        let classes: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        Ok(LabelEncoder { classes: classes.into_iter().map(str::to_string).collect() })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, label: &str) -> Result<usize, EncoderError> {
        self.classes
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| EncoderError::UnknownLabel(label.to_string()))
    }

    /// Encodes a full target vector into numeric codes for regression.
    pub fn encode_all(&self, labels: &[String]) -> Result<Array1<f64>, EncoderError> {
        let codes = labels
            .iter()
            .map(|label| self.encode(label).map(|c| c as f64))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Array1::from_vec(codes))
    }

    /// Maps a numeric code back to its label.
    pub fn decode(&self, code: i64) -> Result<&str, EncoderError> {
        if code < 0 || code as usize >= self.classes.len() {
            return Err(EncoderError::CodeOutOfRange { code, n_classes: self.classes.len() });
        }
        Ok(&self.classes[code as usize])
    }
}
