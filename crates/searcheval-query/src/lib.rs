//! searcheval-query
//!
//! Query-body construction for the three retrieval strategies, projection of
//! raw engine hits into uniform result records, and the `SearchService`
//! facade that runs one (term, strategy) search with the soft-failure
//! policy.

pub mod project;
pub mod query;
pub mod service;

pub use project::project_hits;
pub use query::{hybrid_query, lexical_query, semantic_query, FieldWeights};
pub use service::{QueryParams, SearchService};
