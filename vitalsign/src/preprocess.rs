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

//! Training-time cleaning and feature engineering.
//!
//! Missing-value policy per field: `Age`, `SleepHours` and `HealthyMeals`
//! take the column median, `MealsPerDay` the column mode, `TeaCoffeePerDay`
//! and `ExerciseDays` fall back to 0, and a missing label becomes
//! `"Average"`. Duplicate rows and rows that still carry a missing value
//! after imputation are dropped.

use std::collections::{HashMap, HashSet};

use log::info;
use ndarray::Array2;

use crate::data::RawRecord;
use crate::errors::PipelineError;
use crate::features::{safe_ratio, FeatureSchema, DERIVED_FIELDS, RAW_FIELDS};
use crate::scalers::StandardScaler;

/// Label assigned when a record has no `HealthStatus` value.
pub const DEFAULT_LABEL: &str = "Average";

/// Output of the preprocessing pipeline: the scaled feature matrix, the
/// string targets, and the two artifacts that must be reproduced exactly at
/// inference time.
#[derive(Debug)]
pub struct PreparedDataset {
    pub features: Array2<f64>,
    pub labels: Vec<String>,
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
}

struct Row {
    values: [Option<f64>; 6],
    label: Option<String>,
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

/// Median with pandas-style interpolation for even-length columns.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Most frequent value; ties break toward the smallest.
fn mode(values: &[f64]) -> Option<f64> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v.to_bits()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(bits, count)| (f64::from_bits(bits), count))
        .max_by(|a, b| {
            a.1.cmp(&b.1).then_with(|| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal))
        })
        .map(|(value, _)| value)
}

fn column(rows: &[Row], index: usize) -> Vec<f64> {
    rows.iter().filter_map(|r| r.values[index]).collect()
}

fn dedup_key(row: &Row) -> (Vec<Option<u64>>, Option<String>) {
    (row.values.iter().map(|v| v.map(f64::to_bits)).collect(), row.label.clone())
}

/// Cleans raw records, derives the ratio features, and fits the scaler.
pub fn preprocess(records: &[RawRecord]) -> Result<PreparedDataset, PipelineError> {
    let total = records.len();

    let mut rows: Vec<Row> = records
        .iter()
        .map(|r| Row {
            values: [
                present(r.age),
                present(r.sleep_hours),
                present(r.tea_coffee_per_day),
                present(r.exercise_days),
                present(r.healthy_meals),
                present(r.meals_per_day),
            ],
            label: r.health_status.as_ref().map(|s| s.trim().to_string()),
        })
        .collect();

    // Column positions within Row::values follow RAW_FIELDS order.
    let age_median = median(column(&rows, 0));
    let sleep_median = median(column(&rows, 1));
    let healthy_median = median(column(&rows, 4));
    let meals_mode = mode(&column(&rows, 5));

    for row in &mut rows {
        row.values[0] = row.values[0].or(age_median);
        row.values[1] = row.values[1].or(sleep_median);
        row.values[2] = row.values[2].or(Some(0.0));
        row.values[3] = row.values[3].or(Some(0.0));
        row.values[4] = row.values[4].or(healthy_median);
        row.values[5] = row.values[5].or(meals_mode);
        if row.label.is_none() {
            row.label = Some(DEFAULT_LABEL.to_string());
        }
    }

    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(dedup_key(row)));
    let after_dedup = rows.len();

    rows.retain(|row| row.values.iter().all(Option::is_some));
    let kept = rows.len();

    info!(
        "Preprocessing kept {kept} of {total} rows ({} duplicates, {} incomplete)",
        total - after_dedup,
        after_dedup - kept
    );

    if rows.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let n_cols = RAW_FIELDS.len() + DERIVED_FIELDS.len();
    let mut data = Vec::with_capacity(rows.len() * n_cols);
    let mut labels = Vec::with_capacity(rows.len());
    for row in &rows {
        let [age, sleep, tea, exercise, healthy_meals, meals] =
            row.values.map(|v| v.unwrap_or(0.0));
        data.extend_from_slice(&[age, sleep, tea, exercise, healthy_meals, meals]);
        data.push(safe_ratio(meals, sleep));
        data.push(safe_ratio(exercise, age));
        data.push(safe_ratio(tea, meals));
        labels.push(row.label.clone().unwrap_or_else(|| DEFAULT_LABEL.to_string()));
    }

    let matrix = Array2::from_shape_vec((rows.len(), n_cols), data)
        .map_err(|_| PipelineError::EmptyDataset)?;

    let mut scaler = StandardScaler::new();
    let features = scaler.fit_transform(&matrix)?;

    Ok(PreparedDataset { features, labels, schema: FeatureSchema::training_order(), scaler })
}
