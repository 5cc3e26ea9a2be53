//! Search engine client.
//!
//! Thin blocking wrapper over the engine's HTTP API: connectivity check,
//! match-all document collection, generic query execution, and per-document
//! upserts. Connectivity is verified at construction and is the only fatal
//! failure; everything else is reported to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use searcheval_core::error::Error;
use searcheval_core::traits::SearchBackend;
use searcheval_core::types::{Document, Hit};

pub struct EngineClient {
    client: Client,
    host: String,
}

impl EngineClient {
    /// Builds the client and verifies the engine is reachable.
    pub fn connect(host: &str, api_key: Option<&str>, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(
            host.starts_with("http://") || host.starts_with("https://"),
            "engine host must be an http(s) URL"
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let auth = format!("ApiKey {}", key.trim());
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&auth).context("invalid engine API key")?,
            );
        }
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build engine HTTP client")?;
        let engine = Self { client, host: host.trim_end_matches('/').to_string() };
        if !engine.ping() {
            return Err(Error::Connection(format!(
                "could not reach search engine at {host}, check URL and credentials"
            ))
            .into());
        }
        info!(host = %engine.host, "connected to search engine");
        Ok(engine)
    }

    pub fn ping(&self) -> bool {
        self.client
            .get(format!("{}/", self.host))
            .send()
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    /// Collects up to `size` documents from an index with a match-all query.
    pub fn fetch_documents(&self, index: &str, size: usize) -> Result<Vec<Document>> {
        let body = json!({ "size": size, "query": { "match_all": {} } });
        let hits = self.post_search(index, &body, None)?;
        Ok(hits.into_iter().map(|hit| hit.source).collect())
    }

    /// Executes an arbitrary query body, returning at most `size` hits.
    pub fn search(&self, index: &str, body: &Value, size: usize) -> Result<Vec<Hit>> {
        self.post_search(index, body, Some(size))
    }

    /// Upserts documents one at a time; the document's `id` field, when
    /// present, becomes the engine id, otherwise the engine assigns one.
    /// Failures are logged and skipped. Returns the success count.
    pub fn index_documents(&self, index: &str, documents: &[Document]) -> usize {
        info!(index, count = documents.len(), "populating index");
        let mut indexed = 0usize;
        for document in documents {
            let doc_id = document.get("id").map(render_id);
            let request = match &doc_id {
                Some(id) => self.client.put(format!("{}/{}/_doc/{}", self.host, index, id)),
                None => self.client.post(format!("{}/{}/_doc", self.host, index)),
            };
            let outcome = request
                .json(document)
                .send()
                .map_err(anyhow::Error::from)
                .and_then(|resp| resp.error_for_status().map_err(anyhow::Error::from));
            match outcome {
                Ok(_) => indexed += 1,
                Err(e) => error!(
                    index,
                    id = doc_id.as_deref().unwrap_or(""),
                    error = %e,
                    "failed to index document"
                ),
            }
        }
        info!(index, indexed, "index population finished");
        indexed
    }

    fn post_search(&self, index: &str, body: &Value, size: Option<usize>) -> Result<Vec<Hit>> {
        let mut request = self
            .client
            .post(format!("{}/{}/_search", self.host, index))
            .json(body);
        if let Some(size) = size {
            request = request.query(&[("size", size)]);
        }
        let response = request
            .send()
            .with_context(|| format!("search request to index '{index}' failed"))?
            .error_for_status()
            .with_context(|| format!("search on index '{index}' rejected"))?;
        let parsed: SearchResponse = response
            .json()
            .context("failed to parse engine search response")?;
        Ok(parsed
            .hits
            .hits
            .into_iter()
            .map(|hit| Hit { source: hit.source, score: hit.score.unwrap_or_default() })
            .collect())
    }
}

impl SearchBackend for EngineClient {
    fn ping(&self) -> bool {
        EngineClient::ping(self)
    }
    fn fetch_documents(&self, index: &str, size: usize) -> Result<Vec<Document>> {
        EngineClient::fetch_documents(self, index, size)
    }
    fn search(&self, index: &str, body: &Value, size: usize) -> Result<Vec<Hit>> {
        EngineClient::search(self, index, body, size)
    }
    fn index_documents(&self, index: &str, documents: &[Document]) -> usize {
        EngineClient::index_documents(self, index, documents)
    }
}

fn render_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_source", default)]
    source: Document,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
}
