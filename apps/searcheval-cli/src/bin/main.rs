use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use searcheval_client::{EmbeddingClient, EngineClient, RemoteEmbedder};
use searcheval_core::config::Settings;
use searcheval_core::types::{SearchKind, SearchResult};
use searcheval_enrich::{enrich_documents, read_search_terms};
use searcheval_query::{FieldWeights, QueryParams, SearchService};

const ENGINE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SummaryRow {
    searched_term: String,
    search_type: String,
    execution_time_s: f64,
    result_product_names: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    println!("searcheval\n==========");

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading settings: {}", e);
        e
    })?;

    // Connectivity is the only abort-worthy condition
    let engine = EngineClient::connect(&settings.engine_host, settings.engine_api_key.as_deref(), ENGINE_TIMEOUT)?;
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
        warn!(index = %settings.source_index, "no products collected, exiting");
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
        warn!("no documents survived enrichment, exiting");
        return Ok(());
    }
    let indexed = engine.index_documents(&settings.dest_index, &outcome.documents);
    println!(
        "📦 Indexed {}/{} documents into '{}' ({} with embeddings)",
        indexed,
        outcome.documents.len(),
        settings.dest_index,
        outcome.embedded
    );

    let terms = read_search_terms(&settings.search_terms_file);
    if terms.is_empty() {
        warn!(path = %settings.search_terms_file.display(), "no search terms read, exiting");
        return Ok(());
    }

    let service = SearchService::new(
        &engine,
        &embedder,
        QueryParams {
            vector_field: settings.embedding_field.clone(),
            k: settings.search_results_limit,
            weights: FieldWeights::default(),
        },
    );

    fs::create_dir_all(&settings.results_dir)?;
    let mut summary = Vec::new();
    for term in &terms {
        info!(term = %term, "performing searches");
        for kind in SearchKind::ALL {
            let started = Instant::now();
            let results = service.run(kind, term, &settings.dest_index);
            let elapsed = started.elapsed().as_secs_f64();

            let path = results_path(&settings.results_dir, term, kind);
            write_results(&path, &results)?;
            println!(
                "  {} search for '{}': {} results in {:.3}s -> {}",
                kind.label(),
                term,
                results.len(),
                elapsed,
                path.display()
            );

            summary.push(SummaryRow {
                searched_term: term.clone(),
                search_type: kind.label().to_string(),
                execution_time_s: elapsed,
                result_product_names: results
                    .iter()
                    .map(|r| r.product_name.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }
    }

    let summary_path = settings.results_dir.join("summary_search_tests.csv");
    write_summary(&summary_path, &summary)?;
    println!("\n✅ Evaluation complete, summary saved to {}", summary_path.display());
    Ok(())
}

fn results_path(results_dir: &Path, term: &str, kind: SearchKind) -> PathBuf {
    results_dir.join(format!("{}_{}.csv", term.replace(' ', "_"), kind.as_str()))
}

fn write_results(path: &Path, results: &[SearchResult]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_summary(path: &Path, rows: &[SummaryRow]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
