//! Projection of raw engine hits into uniform result records.

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::warn;

use searcheval_core::types::{Hit, SearchResult};

/// Maps hits into `SearchResult`s, preserving the engine's order (it is
/// already score-sorted; nothing is re-sorted here). A hit that cannot be
/// mapped is dropped individually; the rest of the set survives.
pub fn project_hits(hits: Vec<Hit>) -> Vec<SearchResult> {
    hits.into_iter()
        .filter_map(|hit| match project_one(hit) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "dropping unmappable hit");
                None
            }
        })
        .collect()
}

fn project_one(hit: Hit) -> Result<SearchResult> {
    let product_id = hit
        .source
        .get("id")
        .filter(|v| !v.is_null())
        .cloned()
        .ok_or_else(|| anyhow!("hit source has no id"))?;
    let product_name = hit
        .source
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("hit source has no name"))?
        .to_string();
    let product_url = hit
        .source
        .get("productUrl")
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string();
    Ok(SearchResult { product_id, product_name, product_url, score: hit.score })
}
