use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use searcheval_client::{EmbeddingClient, EngineClient, RemoteEmbedder};
use searcheval_core::traits::Embedder;

fn vector(dim: usize, fill: f32) -> Vec<f32> {
    vec![fill; dim]
}

#[test]
fn embed_sends_contract_fields_and_returns_vectors() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/embeddings")
            .header("authorization", "Bearer secret-token")
            .json_body_partial(
                r#"{
                    "instances": {"texts": ["wireless mouse", "usb hub"]},
                    "parameters": {"model": "text-embedding-model-v1", "dimensions": 4, "encoding_format": "float"}
                }"#,
            );
        then.status(200).json_body(json!({
            "embeddings": [
                {"values": [0.1, 0.2, 0.3, 0.4]},
                {"values": [0.5, 0.6, 0.7, 0.8]}
            ]
        }));
    });

    let client =
        EmbeddingClient::new(&server.url("/embeddings"), Some("secret-token"), 10).expect("client");
    let texts = vec!["wireless mouse".to_string(), "usb hub".to_string()];
    let vectors = client.embed(&texts, "text-embedding-model-v1", 4).expect("embed");

    mock.assert();
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0], vec![0.1, 0.2, 0.3, 0.4]);
}

#[test]
fn embed_empty_input_returns_without_network_call() {
    let server = MockServer::start();
    let client = EmbeddingClient::new(&server.url("/embeddings"), None, 10).expect("client");
    let vectors = client.embed(&[], "m", 4).expect("embed");
    assert!(vectors.is_empty());
}

#[test]
fn embed_count_mismatch_is_a_whole_batch_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(200).json_body(json!({
            "embeddings": [
                {"values": [0.1, 0.2]},
                {"values": [0.3, 0.4]}
            ]
        }));
    });

    let client = EmbeddingClient::new(&server.url("/embeddings"), None, 10).expect("client");
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let err = client.embed(&texts, "m", 2).unwrap_err();
    assert!(err.to_string().contains("2 vectors for 3 texts"));
}

#[test]
fn embed_entries_without_values_do_not_count() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(200).json_body(json!({
            "embeddings": [
                {"values": [0.1, 0.2]},
                {"error": "truncated"}
            ]
        }));
    });

    let client = EmbeddingClient::new(&server.url("/embeddings"), None, 10).expect("client");
    let texts = vec!["a".to_string(), "b".to_string()];
    assert!(client.embed(&texts, "m", 2).is_err());
}

#[test]
fn embed_server_error_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(500);
    });

    let client = EmbeddingClient::new(&server.url("/embeddings"), None, 10).expect("client");
    assert!(client.embed(&["a".to_string()], "m", 2).is_err());
}

#[test]
fn remote_embedder_reports_dim_and_delegates() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/embeddings");
        then.status(200)
            .json_body(json!({"embeddings": [{"values": vector(4, 0.5)}]}));
    });

    let client = EmbeddingClient::new(&server.url("/embeddings"), None, 10).expect("client");
    let embedder = RemoteEmbedder::new(client, "m".to_string(), 4);
    assert_eq!(embedder.dim(), 4);
    let vectors = embedder.embed_batch(&["a".to_string()]).expect("embed");
    assert_eq!(vectors[0].len(), 4);
}

#[test]
fn connect_pings_the_engine() {
    let server = MockServer::start();
    let ping = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).json_body(json!({"tagline": "You Know, for Search"}));
    });

    let engine = EngineClient::connect(&server.base_url(), None, Duration::from_secs(5));
    assert!(engine.is_ok());
    ping.assert();
}

#[test]
fn connect_fails_fatally_when_unreachable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(401);
    });

    let result = EngineClient::connect(&server.base_url(), Some("bad-key"), Duration::from_secs(5));
    assert!(result.is_err());
}

#[test]
fn search_passes_size_and_parses_hits_in_order() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });
    let search = server.mock(|when, then| {
        when.method(POST)
            .path("/products_with_embeddings/_search")
            .query_param("size", "5");
        then.status(200).json_body(json!({
            "hits": {"hits": [
                {"_score": 9.2, "_source": {"id": "p1", "name": "Wireless Mouse"}},
                {"_score": 4.1, "_source": {"id": "p2", "name": "Mouse Pad"}}
            ]}
        }));
    });

    let engine =
        EngineClient::connect(&server.base_url(), None, Duration::from_secs(5)).expect("connect");
    let body = json!({"query": {"match_all": {}}});
    let hits = engine.search("products_with_embeddings", &body, 5).expect("search");

    search.assert();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].score, 9.2);
    assert_eq!(hits[0].source.get("id"), Some(&json!("p1")));
    assert_eq!(hits[1].score, 4.1);
}

#[test]
fn fetch_documents_uses_match_all_and_returns_sources() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });
    let search = server.mock(|when, then| {
        when.method(POST)
            .path("/products_source/_search")
            .json_body(json!({"size": 2, "query": {"match_all": {}}}));
        then.status(200).json_body(json!({
            "hits": {"hits": [
                {"_score": 1.0, "_source": {"id": "p1", "name": "Mouse"}},
                {"_score": 1.0, "_source": {"id": "p2", "name": "Hub"}}
            ]}
        }));
    });

    let engine =
        EngineClient::connect(&server.base_url(), None, Duration::from_secs(5)).expect("connect");
    let docs = engine.fetch_documents("products_source", 2).expect("fetch");

    search.assert();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1].get("name"), Some(&json!("Hub")));
}

#[test]
fn index_documents_counts_successes_and_skips_failures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(PUT).path("/dest/_doc/p1");
        then.status(201);
    });
    server.mock(|when, then| {
        when.method(PUT).path("/dest/_doc/p2");
        then.status(500);
    });
    let auto_id = server.mock(|when, then| {
        when.method(POST).path("/dest/_doc");
        then.status(201);
    });

    let engine =
        EngineClient::connect(&server.base_url(), None, Duration::from_secs(5)).expect("connect");
    let docs: Vec<_> = [
        json!({"id": "p1", "name": "Mouse"}),
        json!({"id": "p2", "name": "Hub"}),
        json!({"name": "No id at all"}),
    ]
    .iter()
    .map(|v| v.as_object().expect("object").clone())
    .collect();

    let indexed = engine.index_documents("dest", &docs);
    assert_eq!(indexed, 2, "one success per reachable document");
    auto_id.assert();
}
