//! Search execution facade.
//!
//! One `SearchService` per run, holding the engine and embedder behind their
//! traits. Every runner is soft: an engine or embedding failure yields an
//! empty result list for that (term, kind) and the caller's loop continues.

use serde_json::Value;
use tracing::{error, info, warn};

use searcheval_core::traits::{Embedder, SearchBackend};
use searcheval_core::types::{SearchKind, SearchResult};

use crate::project::project_hits;
use crate::query::{hybrid_query, lexical_query, semantic_query, FieldWeights};

#[derive(Debug, Clone)]
pub struct QueryParams {
    pub vector_field: String,
    pub k: usize,
    pub weights: FieldWeights,
}

pub struct SearchService<'a> {
    engine: &'a dyn SearchBackend,
    embedder: &'a dyn Embedder,
    params: QueryParams,
}

impl<'a> SearchService<'a> {
    pub fn new(engine: &'a dyn SearchBackend, embedder: &'a dyn Embedder, params: QueryParams) -> Self {
        Self { engine, embedder, params }
    }

    /// Runs one strategy for one term against `index`.
    pub fn run(&self, kind: SearchKind, term: &str, index: &str) -> Vec<SearchResult> {
        match kind {
            SearchKind::Semantic => self.run_semantic(term, index),
            SearchKind::Hybrid => self.run_hybrid(term, index),
            SearchKind::Lexical => self.run_lexical(term, index),
        }
    }

    pub fn run_lexical(&self, term: &str, index: &str) -> Vec<SearchResult> {
        info!(term, index, "executing lexical search");
        let body = lexical_query(term, &self.params.weights);
        self.execute(term, index, SearchKind::Lexical, &body)
    }

    pub fn run_semantic(&self, term: &str, index: &str) -> Vec<SearchResult> {
        info!(term, index, "executing semantic search");
        let Some(vector) = self.query_embedding(term) else {
            return Vec::new();
        };
        let body = semantic_query(&vector, self.params.k, &self.params.vector_field);
        self.execute(term, index, SearchKind::Semantic, &body)
    }

    pub fn run_hybrid(&self, term: &str, index: &str) -> Vec<SearchResult> {
        info!(term, index, "executing hybrid search");
        let vector = self.query_embedding(term);
        let body = hybrid_query(
            term,
            vector.as_deref(),
            &self.params.weights,
            self.params.k,
            &self.params.vector_field,
        );
        self.execute(term, index, SearchKind::Hybrid, &body)
    }

    /// Generates the embedding for a search term; `None` means the term has
    /// no usable vector and the caller must degrade.
    fn query_embedding(&self, term: &str) -> Option<Vec<f32>> {
        match self.embedder.embed_batch(&[term.to_string()]) {
            Ok(mut vectors) if vectors.first().is_some_and(|v| !v.is_empty()) => {
                Some(vectors.remove(0))
            }
            Ok(_) => {
                warn!(term, "could not generate embedding for term");
                None
            }
            Err(e) => {
                warn!(term, error = %e, "could not generate embedding for term");
                None
            }
        }
    }

    fn execute(&self, term: &str, index: &str, kind: SearchKind, body: &Value) -> Vec<SearchResult> {
        match self.engine.search(index, body, self.params.k) {
            Ok(hits) => {
                let results = project_hits(hits);
                info!(term, kind = %kind, count = results.len(), "search returned results");
                results
            }
            Err(e) => {
                error!(term, kind = %kind, error = %e, "search failed");
                Vec::new()
            }
        }
    }
}
