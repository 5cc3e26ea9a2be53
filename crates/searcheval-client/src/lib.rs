//! searcheval-client
//!
//! Blocking HTTP clients for the two external collaborators: the search
//! engine (`engine`) and the embedding service (`embedding`).

pub mod embedding;
pub mod engine;

pub use embedding::{EmbeddingClient, RemoteEmbedder};
pub use engine::EngineClient;
