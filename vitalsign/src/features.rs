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

//! The feature-preparation contract shared by training and serving.
//!
//! Training captures the canonical column order once; serving rebuilds a
//! single row over exactly that order. Both sides derive the same ratio
//! features with the same safe-division rule, so the only persisted degrees
//! of freedom are the column list and the scaler statistics.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Raw survey fields, in dataset order.
pub const RAW_FIELDS: [&str; 6] =
    ["Age", "SleepHours", "TeaCoffeePerDay", "ExerciseDays", "HealthyMeals", "MealsPerDay"];

/// Ratio features derived from the raw fields, in derivation order.
pub const DERIVED_FIELDS: [&str; 3] =
    ["Meals_to_SleepRatio", "Exercise_to_AgeRatio", "Caffeine_to_Meals"];

/// Element-wise safe division: 0 whenever the denominator is not strictly
/// positive. Never raises.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 { numerator / denominator } else { 0.0 }
}

/// One raw prediction input: the six survey fields, each optional.
///
/// Missing fields default to 0 during row assembly. This is intentionally
/// simpler than the training-time imputation and must stay that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,

    #[serde(rename = "SleepHours", default)]
    pub sleep_hours: Option<f64>,

    #[serde(rename = "TeaCoffeePerDay", default)]
    pub tea_coffee_per_day: Option<f64>,

    #[serde(rename = "ExerciseDays", default)]
    pub exercise_days: Option<f64>,

    #[serde(rename = "HealthyMeals", default)]
    pub healthy_meals: Option<f64>,

    #[serde(rename = "MealsPerDay", default)]
    pub meals_per_day: Option<f64>,
}

/// The canonical feature-column list captured at training time.
///
/// Serialized as a plain JSON array of column names so the serving process
/// reads back exactly the order the scaler and models were fitted against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

impl FeatureSchema {
    /// The order produced by the training pipeline: raw fields first, then
    /// the derived ratios.
    pub fn training_order() -> Self {
        let columns = RAW_FIELDS
            .iter()
            .chain(DERIVED_FIELDS.iter())
            .map(|s| s.to_string())
            .collect();
        FeatureSchema { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Builds a single feature row over exactly the canonical columns.
    ///
    /// Missing raw fields default to 0 before the ratios are computed, and
    /// any canonical column that is neither a raw field nor a derived ratio
    /// is filled with 0 rather than failing.
    pub fn assemble_row(&self, input: &RawInput) -> Array1<f64> {
        let age = input.age.unwrap_or(0.0);
        let sleep = input.sleep_hours.unwrap_or(0.0);
        let tea = input.tea_coffee_per_day.unwrap_or(0.0);
        let exercise = input.exercise_days.unwrap_or(0.0);
        let healthy_meals = input.healthy_meals.unwrap_or(0.0);
        let meals = input.meals_per_day.unwrap_or(0.0);

        let values = self.columns.iter().map(|column| match column.as_str() {
            "Age" => age,
            "SleepHours" => sleep,
            "TeaCoffeePerDay" => tea,
            "ExerciseDays" => exercise,
            "HealthyMeals" => healthy_meals,
            "MealsPerDay" => meals,
            "Meals_to_SleepRatio" => safe_ratio(meals, sleep),
            "Exercise_to_AgeRatio" => safe_ratio(exercise, age),
            "Caffeine_to_Meals" => safe_ratio(tea, meals),
            _ => 0.0,
        });
        Array1::from_iter(values)
    }
}
