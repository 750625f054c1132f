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

//! Training entry point.
//!
//! Usage: `vitalsign-train [dataset.csv] [artifacts_dir]`

use anyhow::Result;
use log::info;
use vitalsign::train::{run_training, TrainConfig};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data_path = args.next().unwrap_or_else(|| "dataset/data.csv".to_string());
    let artifacts_dir = args.next().unwrap_or_else(|| "models".to_string());

    let config = TrainConfig::new(&data_path).with_artifacts_dir(&artifacts_dir);
    let summary = run_training(&config)?;

    info!(
        "Training complete: {} train rows, {} held-out rows",
        summary.n_train, summary.n_test
    );
    println!("Linear Regression Performance:");
    println!("  R2   : {:.3}", summary.linear.r2);
    println!("  MAE  : {:.3}", summary.linear.mae);
    println!("  MSE  : {:.3}", summary.linear.mse);
    println!("  RMSE : {:.3}", summary.linear.rmse);
    println!("Random Forest Performance:");
    println!("  R2   : {:.3}", summary.forest.r2);
    println!("  MAE  : {:.3}", summary.forest.mae);
    println!("  MSE  : {:.3}", summary.forest.mse);
    println!("  RMSE : {:.3}", summary.forest.rmse);
    println!("Models and preprocessing artifacts saved to {artifacts_dir}");

    Ok(())
}
