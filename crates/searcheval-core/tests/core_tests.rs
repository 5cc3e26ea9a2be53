use serde_json::json;

use searcheval_core::config::Settings;
use searcheval_core::types::{doc_key, DocKey, Document, SearchKind};

fn doc(value: serde_json::Value) -> Document {
    value.as_object().expect("object").clone()
}

#[test]
fn doc_key_prefers_scalar_id() {
    let with_string = doc(json!({"id": "sku-1", "name": "Mouse"}));
    assert_eq!(doc_key(&with_string, 7), DocKey::Id("sku-1".to_string()));

    let with_number = doc(json!({"id": 42, "name": "Mouse"}));
    assert_eq!(doc_key(&with_number, 7), DocKey::Id("42".to_string()));
}

#[test]
fn doc_key_falls_back_to_position() {
    let missing = doc(json!({"name": "Mouse"}));
    assert_eq!(doc_key(&missing, 3), DocKey::Position(3));

    let null_id = doc(json!({"id": null, "name": "Mouse"}));
    assert_eq!(doc_key(&null_id, 4), DocKey::Position(4));

    // Non-scalar ids are not usable keys
    let object_id = doc(json!({"id": {"nested": true}, "name": "Mouse"}));
    assert_eq!(doc_key(&object_id, 5), DocKey::Position(5));
}

#[test]
fn search_kind_order_and_names() {
    let names: Vec<&str> = SearchKind::ALL.iter().map(|k| k.as_str()).collect();
    assert_eq!(names, vec!["semantic", "hybrid", "lexical"]);
    assert_eq!(SearchKind::Hybrid.label(), "Hybrid");
}

#[test]
fn settings_load_defaults_and_env_override() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_ENGINE_HOST", "http://search.internal:9200");
        jail.set_env("APP_EMBEDDING_BATCH_SIZE", "25");
        let settings = Settings::load().expect("load");
        assert_eq!(settings.engine_host, "http://search.internal:9200");
        assert_eq!(settings.embedding_batch_size, 25);
        // Untouched fields keep their defaults
        assert_eq!(settings.source_index, "products_source");
        assert_eq!(settings.embedding_dimensions, 512);
        assert_eq!(settings.search_results_limit, 5);
        Ok(())
    });
}

#[test]
fn settings_reject_empty_and_zero_values() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_DEST_INDEX", "");
        assert!(Settings::load().is_err());
        Ok(())
    });
    figment::Jail::expect_with(|jail| {
        jail.set_env("APP_EMBEDDING_DIMENSIONS", "0");
        assert!(Settings::load().is_err());
        Ok(())
    });
}
