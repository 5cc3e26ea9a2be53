//! Pure builders for the three query bodies.
//!
//! Scoring shape is fixed: lexical is a weighted `multi_match` with a 2.5
//! clause boost, semantic is a knn query with a 10x candidate over-fetch,
//! hybrid is a `bool.should` of both with an extra 2.0 boost on the knn
//! clause. `_source` is always restricted to the result payload fields.

use serde_json::{json, Value};
use tracing::warn;

/// Fields returned by every query; nothing else may leak into results.
pub const SOURCE_FIELDS: [&str; 3] = ["name", "id", "productUrl"];

/// Candidates examined per requested result in knn queries.
pub const CANDIDATE_FACTOR: usize = 10;

/// Extra boost on the knn clause inside a hybrid query.
pub const KNN_BOOST: f64 = 2.0;

/// Per-field match weights and overall clause boost for lexical scoring.
#[derive(Debug, Clone, Copy)]
pub struct FieldWeights {
    pub name: f64,
    pub description: f64,
    pub boost: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self { name: 10.0, description: 5.0, boost: 2.5 }
    }
}

fn multi_match_clause(term: &str, weights: &FieldWeights) -> Value {
    json!({
        "multi_match": {
            "query": term,
            "fields": [
                format!("name^{:.1}", weights.name),
                format!("description^{:.1}", weights.description),
            ],
            "boost": weights.boost,
        }
    })
}

/// Lexical search body: weighted multi-field text match.
pub fn lexical_query(term: &str, weights: &FieldWeights) -> Value {
    json!({
        "query": multi_match_clause(term, weights),
        "_source": SOURCE_FIELDS,
    })
}

/// Semantic search body: nearest-neighbor lookup over the embedding field.
///
/// Callers without a query vector must short-circuit to an empty result set
/// instead of building a body.
pub fn semantic_query(vector: &[f32], k: usize, field: &str) -> Value {
    json!({
        "knn": {
            "field": field,
            "query_vector": vector,
            "k": k,
            "num_candidates": k * CANDIDATE_FACTOR,
        },
        "_source": SOURCE_FIELDS,
    })
}

/// Hybrid search body: disjunctive combination of the lexical clause and,
/// when a vector is available, the boosted knn clause.
///
/// Without a vector this degrades to exactly the lexical body — a deliberate
/// fallback, not an error.
pub fn hybrid_query(
    term: &str,
    vector: Option<&[f32]>,
    weights: &FieldWeights,
    k: usize,
    field: &str,
) -> Value {
    let Some(vector) = vector else {
        warn!(term, "query embedding not available, hybrid degrades to lexical only");
        return lexical_query(term, weights);
    };
    json!({
        "query": {
            "bool": {
                "should": [
                    multi_match_clause(term, weights),
                    {
                        "knn": {
                            "field": field,
                            "query_vector": vector,
                            "k": k,
                            "num_candidates": k * CANDIDATE_FACTOR,
                            "boost": KNN_BOOST,
                        }
                    },
                ],
                "minimum_should_match": 1,
            }
        },
        "_source": SOURCE_FIELDS,
    })
}
