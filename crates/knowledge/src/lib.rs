//! Cuisine knowledge for recipe generation: static packs of pantry anchors
//! and technique rules per cuisine, and retrieval that picks the memory
//! snippets worth putting in front of the model.
//!
//! Retrieval is a lexical shortlist (tag and word hits) optionally reranked
//! by a blended lexical + embedding-cosine score. Embeddings come from an
//! HTTP API and are cached in memory and on disk; when they are unavailable
//! the lexical order stands.

mod cache;
mod embeddings;
mod error;
mod pack;
mod retrieval;
mod tags;

pub use cache::EmbeddingCache;
pub use embeddings::{cosine_similarity, EmbeddingClient, EmbeddingProvider};
pub use error::{KnowledgeError, Result};
pub use pack::{normalize_cuisine, CuisinePack, PackLibrary, Snippet};
pub use retrieval::{build_context, KnowledgeContext, KnowledgeInput};
pub use tags::infer_tags;
