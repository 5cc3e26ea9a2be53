use std::env;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use searcheval_client::{EmbeddingClient, EngineClient, RemoteEmbedder};
use searcheval_core::config::Settings;
use searcheval_core::types::SearchKind;
use searcheval_query::{FieldWeights, QueryParams, SearchService};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <term> [index]", args[0]);
        eprintln!("Example: {} 'wireless mouse' products_with_embeddings", args[0]);
        std::process::exit(1);
    }
    let term = &args[1];

    let settings = Settings::load().map_err(|e| {
        eprintln!("Error loading settings: {}", e);
        e
    })?;
    let index = args.get(2).cloned().unwrap_or_else(|| settings.dest_index.clone());

    println!("🔍 searcheval-search-only\n=========================");
    println!("Term: {}", term);
    println!("Index: {}", index);

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
    let service = SearchService::new(
        &engine,
        &embedder,
        QueryParams {
            vector_field: settings.embedding_field.clone(),
            k: settings.search_results_limit,
            weights: FieldWeights::default(),
        },
    );

    for kind in SearchKind::ALL {
        let results = service.run(kind, term, &index);
        println!("\n🔍 {} search: {} results for \"{}\"", kind.label(), results.len(), term);
        for (i, result) in results.iter().enumerate() {
            let id = result
                .product_id
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| result.product_id.to_string());
            println!(
                "  {}. score={:.4}  id={}  name={}  url={}",
                i + 1,
                result.score,
                id,
                result.product_name,
                result.product_url
            );
        }
    }
    Ok(())
}
