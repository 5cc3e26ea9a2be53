//! Domain types shared by the enrichment pipeline and the search service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A catalog document as stored in the engine: a schemaless field → value map.
///
/// Expected fields: `id` (stable scalar identifier), `name` (string),
/// optional `description` (string or structured value), optional
/// `productUrl`. Enrichment inserts the embedding field; nothing is removed.
pub type Document = serde_json::Map<String, Value>;

/// Key used to re-associate batched embedding results with their documents.
///
/// The rendered `id` scalar when present, otherwise the document's position
/// in the input collection. A positional key can collide with another
/// document's real `id` if the catalog is reordered upstream; the pipeline
/// warns on duplicates but does not guard further.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocKey {
    Id(String),
    Position(usize),
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocKey::Id(id) => write!(f, "{id}"),
            DocKey::Position(pos) => write!(f, "#{pos}"),
        }
    }
}

/// Derives the re-association key for a document at `position`.
///
/// Only scalar `id` values qualify; `null`, arrays, and objects fall back to
/// the positional key.
pub fn doc_key(doc: &Document, position: usize) -> DocKey {
    match doc.get("id") {
        Some(Value::String(s)) => DocKey::Id(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => DocKey::Id(v.to_string()),
        _ => DocKey::Position(position),
    }
}

/// One raw hit from the engine: the stored source plus its relevance score.
#[derive(Debug, Clone)]
pub struct Hit {
    pub source: Document,
    pub score: f64,
}

/// Which retrieval strategy produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchKind {
    Semantic,
    Hybrid,
    Lexical,
}

impl SearchKind {
    /// All strategies, in the order a run executes them.
    pub const ALL: [SearchKind; 3] = [SearchKind::Semantic, SearchKind::Hybrid, SearchKind::Lexical];

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Semantic => "semantic",
            SearchKind::Hybrid => "hybrid",
            SearchKind::Lexical => "lexical",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchKind::Semantic => "Semantic",
            SearchKind::Hybrid => "Hybrid",
            SearchKind::Lexical => "Lexical",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A projected engine hit. Scores are engine-relative and not comparable
/// across search kinds. Serializes with the report column headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "Product ID")]
    pub product_id: Value,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Product URL")]
    pub product_url: String,
    #[serde(rename = "Score")]
    pub score: f64,
}
