//! Typed configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env
//! vars into one `Settings` struct, built once at startup and passed into
//! each component. Defaults match the evaluated deployment.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_engine_host")]
    pub engine_host: String,
    #[serde(default)]
    pub engine_api_key: Option<String>,

    #[serde(default = "default_source_index")]
    pub source_index: String,
    #[serde(default = "default_dest_index")]
    pub dest_index: String,
    #[serde(default = "default_embedding_field")]
    pub embedding_field: String,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    #[serde(default = "default_embedding_url")]
    pub embedding_url: String,
    #[serde(default)]
    pub embedding_api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,

    #[serde(default = "default_search_terms_file")]
    pub search_terms_file: PathBuf,
    #[serde(default = "default_search_results_limit")]
    pub search_results_limit: usize,
    #[serde(default = "default_source_fetch_size")]
    pub source_fetch_size: usize,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let non_empty = [
            ("engine_host", &self.engine_host),
            ("source_index", &self.source_index),
            ("dest_index", &self.dest_index),
            ("embedding_field", &self.embedding_field),
            ("embedding_url", &self.embedding_url),
            ("embedding_model", &self.embedding_model),
        ];
        for (key, value) in non_empty {
            if value.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("'{key}' must not be empty")));
            }
        }
        let non_zero = [
            ("embedding_dimensions", self.embedding_dimensions),
            ("embedding_batch_size", self.embedding_batch_size),
            ("search_results_limit", self.search_results_limit),
            ("source_fetch_size", self.source_fetch_size),
        ];
        for (key, value) in non_zero {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("'{key}' must be greater than zero")));
            }
        }
        Ok(())
    }
}

fn default_engine_host() -> String {
    "http://localhost:9200".to_string()
}

fn default_source_index() -> String {
    "products_source".to_string()
}

fn default_dest_index() -> String {
    "products_with_embeddings".to_string()
}

fn default_embedding_field() -> String {
    "productEmbedding".to_string()
}

fn default_embedding_dimensions() -> usize {
    512
}

fn default_embedding_url() -> String {
    "http://localhost:8000/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-model-v1".to_string()
}

fn default_embedding_batch_size() -> usize {
    10
}

fn default_search_terms_file() -> PathBuf {
    PathBuf::from("terms_to_search.txt")
}

fn default_search_results_limit() -> usize {
    5
}

fn default_source_fetch_size() -> usize {
    500
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}
