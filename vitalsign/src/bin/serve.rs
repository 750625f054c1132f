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

//! Serving entry point.
//!
//! Usage: `vitalsign-serve [artifacts_dir]`, bind address taken from
//! `VITALSIGN_ADDR` (default `0.0.0.0:8000`). All artifacts are loaded
//! before the listener starts; a missing or corrupt artifact aborts here.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use vitalsign::artifacts::ArtifactStore;
use vitalsign::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let artifacts_dir =
        std::env::args().nth(1).unwrap_or_else(|| "models".to_string());
    let addr =
        std::env::var("VITALSIGN_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let store = ArtifactStore::new(&artifacts_dir);
    let state = AppState::from_store(&store)
        .with_context(|| format!("failed to load artifacts from {artifacts_dir}"))?;

    let app = server::router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Serving predictions on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
