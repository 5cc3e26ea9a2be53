//! Embedding service client.
//!
//! One POST per batch; the response must carry exactly one vector per input
//! text or the call fails as a whole. The request timeout scales with the
//! configured batch size.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use searcheval_core::traits::Embedder;

/// Seconds of timeout granted per text in a full batch.
const TIMEOUT_PER_TEXT_SECS: u64 = 5;

pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    batch_size: usize,
}

impl EmbeddingClient {
    pub fn new(endpoint: &str, api_key: Option<&str>, batch_size: usize) -> Result<Self> {
        anyhow::ensure!(
            endpoint.starts_with("http://") || endpoint.starts_with("https://"),
            "embedding endpoint must be an http(s) URL"
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let auth = format!("Bearer {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth).context("invalid embedding API key")?,
            );
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            batch_size: batch_size.max(1),
        })
    }

    /// Generates embeddings for a list of texts in a single API call.
    ///
    /// Success means exactly one vector per input text; a shorter list, a
    /// missing payload, or any transport error is an `Err` for the whole
    /// batch. An empty input returns an empty list without a network call.
    pub fn embed(&self, texts: &[String], model: &str, dimensions: usize) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbedRequest {
            instances: Instances { texts },
            parameters: Parameters { model, dimensions, encoding_format: "float" },
        };
        // Larger configured batches get proportionally more time
        let timeout = Duration::from_secs(self.batch_size as u64 * TIMEOUT_PER_TEXT_SECS);
        debug!(count = texts.len(), model, "requesting embeddings");
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(timeout)
            .json(&request)
            .send()
            .context("embedding request failed")?
            .error_for_status()
            .context("embedding request rejected")?;
        let parsed: EmbedResponse = response
            .json()
            .context("failed to parse embedding response")?;
        let vectors: Vec<Vec<f32>> = parsed
            .embeddings
            .into_iter()
            .filter_map(|entry| entry.values)
            .collect();
        anyhow::ensure!(
            vectors.len() == texts.len(),
            "embedding service returned {} vectors for {} texts",
            vectors.len(),
            texts.len()
        );
        Ok(vectors)
    }
}

/// Binds an `EmbeddingClient` plus model identity to the `Embedder` trait.
pub struct RemoteEmbedder {
    client: EmbeddingClient,
    model: String,
    dimensions: usize,
}

impl RemoteEmbedder {
    pub fn new(client: EmbeddingClient, model: String, dimensions: usize) -> Self {
        Self { client, model, dimensions }
    }
}

impl Embedder for RemoteEmbedder {
    fn dim(&self) -> usize {
        self.dimensions
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.client.embed(texts, &self.model, self.dimensions)
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    instances: Instances<'a>,
    parameters: Parameters<'a>,
}

#[derive(Serialize)]
struct Instances<'a> {
    texts: &'a [String],
}

#[derive(Serialize)]
struct Parameters<'a> {
    model: &'a str,
    dimensions: usize,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    values: Option<Vec<f32>>,
}
