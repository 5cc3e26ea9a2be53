//! searcheval-enrich
//!
//! Embedding backfill: derives one embedding text per catalog document,
//! submits eligible texts to the embedder in sequential batches, and
//! re-associates each returned vector with its document through an explicit
//! ordered key list. A failed batch passes its documents through without an
//! embedding field; nothing aborts the run.

use std::collections::HashMap;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use searcheval_core::traits::Embedder;
use searcheval_core::types::{doc_key, DocKey, Document};

/// Counters and the enriched documents from one backfill run.
///
/// `documents` is in insertion (batch) order, which matches input order only
/// when nothing was skipped; skipped documents are not emitted.
#[derive(Debug, Default)]
pub struct EnrichOutcome {
    pub documents: Vec<Document>,
    pub embedded: usize,
    pub soft_failed: usize,
    pub skipped: usize,
}

/// Adds embeddings to each document, using batch calls to the embedder.
///
/// The embedding text combines `name` and `description`; documents whose
/// combined text is blank are skipped. A batch whose call fails, returns the
/// wrong vector count, or returns a vector of the wrong dimensionality is a
/// soft failure: its documents are emitted without the embedding field and
/// processing continues with the next batch.
pub fn enrich_documents(
    products: Vec<Document>,
    embedder: &dyn Embedder,
    batch_size: usize,
    embedding_field: &str,
) -> EnrichOutcome {
    info!(count = products.len(), "starting embedding backfill");
    let batch_size = batch_size.max(1);

    // Ordered slots keyed by document id (position when absent) so batched
    // results re-associate exactly
    let mut slots: Vec<Option<Document>> = Vec::with_capacity(products.len());
    let mut by_key: HashMap<DocKey, usize> = HashMap::new();
    let mut eligible: Vec<(DocKey, String)> = Vec::new();
    let mut skipped = 0usize;

    for (position, doc) in products.into_iter().enumerate() {
        let key = doc_key(&doc, position);
        let text = embedding_text(&doc);
        if text.trim().is_empty() {
            warn!(key = %key, "document has no name or description, skipping embedding");
            skipped += 1;
        } else {
            eligible.push((key.clone(), text));
        }
        if by_key.insert(key.clone(), slots.len()).is_some() {
            warn!(key = %key, "duplicate document key, re-association may drop a document");
        }
        slots.push(Some(doc));
    }

    let total_batches = eligible.len().div_ceil(batch_size);
    let pb = ProgressBar::new(eligible.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} texts {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut outcome = EnrichOutcome { skipped, ..EnrichOutcome::default() };
    for (batch_index, batch) in eligible.chunks(batch_size).enumerate() {
        let texts: Vec<String> = batch.iter().map(|(_, text)| text.clone()).collect();
        info!(
            batch = batch_index + 1,
            total = total_batches,
            size = texts.len(),
            "processing embedding batch"
        );

        let validated = match embedder.embed_batch(&texts) {
            Ok(vectors) if vectors.len() != texts.len() => Err(format!(
                "returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )),
            Ok(vectors) => match vectors.iter().find(|v| v.len() != embedder.dim()) {
                Some(bad) => Err(format!(
                    "returned a vector of {} components, expected {}",
                    bad.len(),
                    embedder.dim()
                )),
                None => Ok(vectors),
            },
            Err(e) => Err(e.to_string()),
        };

        match validated {
            Ok(vectors) => {
                for ((key, _), vector) in batch.iter().zip(vectors) {
                    match take_document(&by_key, &mut slots, key) {
                        Some(mut doc) => {
                            doc.insert(embedding_field.to_string(), json!(vector));
                            outcome.documents.push(doc);
                            outcome.embedded += 1;
                        }
                        None => warn!(key = %key, "no document left for embedding re-association"),
                    }
                }
            }
            Err(reason) => {
                warn!(
                    batch = batch_index + 1,
                    reason = %reason,
                    "embedding batch failed, documents pass through without embeddings"
                );
                for (key, _) in batch {
                    if let Some(doc) = take_document(&by_key, &mut slots, key) {
                        outcome.documents.push(doc);
                        outcome.soft_failed += 1;
                    }
                }
            }
        }
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    info!(
        total = outcome.documents.len(),
        embedded = outcome.embedded,
        soft_failed = outcome.soft_failed,
        skipped = outcome.skipped,
        "embedding backfill complete"
    );
    outcome
}

fn take_document(
    by_key: &HashMap<DocKey, usize>,
    slots: &mut [Option<Document>],
    key: &DocKey,
) -> Option<Document> {
    by_key.get(key).and_then(|&slot| slots[slot].take())
}

/// Text submitted to the embedder for one document: `name` and `description`
/// concatenated, missing fields treated as empty. Structured descriptions
/// are rendered as JSON text.
pub fn embedding_text(doc: &Document) -> String {
    format!("{} {}", field_text(doc, "name"), field_text(doc, "description"))
}

fn field_text(doc: &Document, field: &str) -> String {
    match doc.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reads search terms from a text file, one per line, trimmed, empties
/// dropped. A missing or unreadable file logs an error and yields an empty
/// list so the caller can end the search phase gracefully.
pub fn read_search_terms(path: &Path) -> Vec<String> {
    info!(path = %path.display(), "reading search terms");
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let terms: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            info!(count = terms.len(), "search terms read");
            terms
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "could not read search terms file");
            Vec::new()
        }
    }
}
