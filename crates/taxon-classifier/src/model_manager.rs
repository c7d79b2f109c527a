// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model download manager for first-run NLI model setup.
//!
//! Downloads the ONNX model and tokenizer from HuggingFace on first use and
//! caches them under `<data_dir>/models/<model_name>/`.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use taxon_config::model::ClassifierConfig;
use taxon_core::TaxonError;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::info;

/// Manages ONNX model download and path resolution.
pub struct ModelManager {
    data_dir: PathBuf,
    model_name: String,
    model_url: String,
    tokenizer_url: String,
    /// Ensures files are downloaded only once even with concurrent callers.
    ready: OnceCell<PathBuf>,
}

impl ModelManager {
    pub fn new(
        data_dir: PathBuf,
        model_name: impl Into<String>,
        model_url: impl Into<String>,
        tokenizer_url: impl Into<String>,
    ) -> Self {
        Self {
            data_dir,
            model_name: model_name.into(),
            model_url: model_url.into(),
            tokenizer_url: tokenizer_url.into(),
            ready: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.resolved_data_dir(),
            config.model_name.clone(),
            config.model_url.clone(),
            config.tokenizer_url.clone(),
        )
    }

    /// Returns the directory where model files are stored.
    pub fn model_dir(&self) -> PathBuf {
        self.data_dir.join("models").join(&self.model_name)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    /// Returns true if both model and tokenizer files exist.
    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    /// Ensures the model files are present, downloading missing ones.
    ///
    /// Subsequent calls are no-ops.
    pub async fn ensure_model(&self) -> Result<PathBuf, TaxonError> {
        self.ready
            .get_or_try_init(|| self.download_missing())
            .await
            .cloned()
    }

    async fn download_missing(&self) -> Result<PathBuf, TaxonError> {
        if self.is_model_available() {
            return Ok(self.model_path());
        }

        info!(model = %self.model_name, "classifier model not found, downloading");

        let model_dir = self.model_dir();
        tokio::fs::create_dir_all(&model_dir).await.map_err(|e| {
            TaxonError::classifier(format!(
                "failed to create model directory {}: {e}",
                model_dir.display()
            ))
        })?;

        let files = [
            (self.model_path(), self.model_url.as_str()),
            (self.tokenizer_path(), self.tokenizer_url.as_str()),
        ];

        for (dest, url) in &files {
            if dest.exists() {
                continue;
            }

            info!(url = %url, "downloading {}", dest.display());
            let partial = dest.with_extension("part");
            match download_file(url, &partial).await {
                Ok(size) => {
                    tokio::fs::rename(&partial, dest).await.map_err(|e| {
                        TaxonError::classifier(format!(
                            "failed to move {} into place: {e}",
                            partial.display()
                        ))
                    })?;
                    info!(bytes = size, "downloaded {}", dest.display());
                }
                Err(e) => {
                    // Clean up partial download
                    let _ = tokio::fs::remove_file(&partial).await;
                    return Err(e);
                }
            }
        }

        info!("classifier model ready at {}", model_dir.display());
        Ok(self.model_path())
    }
}

/// Stream a URL to a local file. Returns the number of bytes written.
async fn download_file(url: &str, dest: &Path) -> Result<u64, TaxonError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| TaxonError::classifier(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(TaxonError::classifier(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| TaxonError::classifier(format!("failed to create {}: {e}", dest.display())))?;

    let mut size = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| {
            TaxonError::classifier(format!("failed to read response body from {url}: {e}"))
        })?;
        file.write_all(&chunk).await.map_err(|e| {
            TaxonError::classifier(format!("failed to write {}: {e}", dest.display()))
        })?;
        size += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| TaxonError::classifier(format!("failed to flush {}: {e}", dest.display())))?;

    Ok(size)
}
