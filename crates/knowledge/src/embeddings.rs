use crate::cache::EmbeddingCache;
use async_trait::async_trait;
use lru::LruCache;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;

const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MEMORY_CACHE_SIZE: usize = 512;

/// Anything that can turn text into a vector. Retrieval treats `None` as
/// "no semantic signal" and falls back to lexical order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Option<Vec<f32>>;
}

/// HTTP embedding client for an OpenAI-compatible `/embeddings` endpoint,
/// fronted by an in-process LRU and the persistent file cache. Every
/// failure path degrades to `None`; retrieval never hard-fails on the
/// network.
pub struct EmbeddingClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    file_cache: Option<EmbeddingCache>,
    memory: Mutex<LruCache<String, Vec<f32>>>,
}

impl EmbeddingClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_EMBED_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            file_cache: None,
            memory: Mutex::new(LruCache::new(
                NonZeroUsize::new(MEMORY_CACHE_SIZE).expect("nonzero cache size"),
            )),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_file_cache(mut self, cache: EmbeddingCache) -> Self {
        self.file_cache = Some(cache);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn cache_key(&self, text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.model.as_bytes());
        hasher.update(b"::");
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    async fn fetch(&self, text: &str) -> Option<Vec<f32>> {
        #[derive(Deserialize)]
        struct EmbeddingData {
            embedding: Vec<f32>,
        }
        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingData>,
        }

        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            log::warn!("embedding request failed with status {}", response.status());
            return None;
        }

        let body: EmbeddingResponse = response.json().await.ok()?;
        let vector = body.data.into_iter().next()?.embedding;
        if vector.is_empty() {
            return None;
        }
        Some(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingClient {
    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        let key = self.cache_key(text);

        if let Ok(mut memory) = self.memory.lock() {
            if let Some(hit) = memory.get(&key) {
                return Some(hit.clone());
            }
        }

        if let Some(cache) = &self.file_cache {
            if let Some(hit) = cache.get_vector(&self.model, &key).await {
                if let Ok(mut memory) = self.memory.lock() {
                    memory.put(key, hit.clone());
                }
                return Some(hit);
            }
        }

        let vector = self.fetch(text).await?;

        if let Some(cache) = &self.file_cache {
            if let Err(e) = cache.put_vector(&self.model, &key, &vector).await {
                // Cache writes are best-effort.
                log::debug!("embedding cache write failed: {e}");
            }
        }
        if let Ok(mut memory) = self.memory.lock() {
            memory.put(key, vector.clone());
        }

        Some(vector)
    }
}

/// Cosine similarity; 0 for empty, mismatched, or zero-magnitude inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f32;
    let mut mag_a = 0.0_f32;
    let mut mag_b = 0.0_f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a.sqrt() * mag_b.sqrt())
}
