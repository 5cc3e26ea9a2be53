use serde_json::Value;

use crate::types::{Document, Hit};

/// Batch embedding capability. Implementations must return one vector of
/// exactly `dim()` components per input text, or fail the whole batch; a
/// partial list is never a valid success.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// The remote search engine surface the evaluation needs.
pub trait SearchBackend: Send + Sync {
    fn ping(&self) -> bool;
    fn fetch_documents(&self, index: &str, size: usize) -> anyhow::Result<Vec<Document>>;
    fn search(&self, index: &str, body: &Value, size: usize) -> anyhow::Result<Vec<Hit>>;
    /// Upserts documents one by one; per-document failures are logged and
    /// skipped. Returns the number successfully indexed.
    fn index_documents(&self, index: &str, documents: &[Document]) -> usize;
}
