use std::time::Duration;

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use searcheval_client::{EmbeddingClient, EngineClient, RemoteEmbedder};
use searcheval_core::config::Settings;
use searcheval_enrich::enrich_documents;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    println!("searcheval-backfill\n===================");

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading settings: {}", e);
        e
    })?;

    let engine = EngineClient::connect(
        &settings.engine_host,
        settings.engine_api_key.as_deref(),
        Duration::from_secs(30),
    )?;
    let embedding_client = EmbeddingClient::new(
        &settings.embedding_url,
        settings.embedding_api_key.as_deref(),
        settings.embedding_batch_size,
    )?;
    let embedder = RemoteEmbedder::new(
        embedding_client,
        settings.embedding_model.clone(),
        settings.embedding_dimensions,
    );

    let products = engine
        .fetch_documents(&settings.source_index, settings.source_fetch_size)
        .unwrap_or_else(|e| {
            error!(index = %settings.source_index, error = %e, "failed to collect products");
            Vec::new()
        });
    if products.is_empty() {
        warn!(index = %settings.source_index, "no products collected, nothing to backfill");
        return Ok(());
    }
    println!("Collected {} products from '{}'", products.len(), settings.source_index);

    let outcome = enrich_documents(
        products,
        &embedder,
        settings.embedding_batch_size,
        &settings.embedding_field,
    );
    if outcome.documents.is_empty() {
        warn!("no documents survived enrichment, nothing to index");
        return Ok(());
    }
    let indexed = engine.index_documents(&settings.dest_index, &outcome.documents);

    println!("\n✅ Backfill completed");
    println!("📊 {} documents embedded, {} soft failures, {} skipped", outcome.embedded, outcome.soft_failed, outcome.skipped);
    println!("📦 {}/{} documents indexed into '{}'", indexed, outcome.documents.len(), settings.dest_index);
    println!("\n💡 To run the evaluation, use: cargo run --bin searcheval");
    Ok(())
}
