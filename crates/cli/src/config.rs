use kitchen_generate::RecipeClient;
use kitchen_knowledge::{EmbeddingCache, EmbeddingClient};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".grandmas-kitchen";

/// Runtime configuration resolved from the environment, then overridden by
/// CLI flags. Everything degrades gracefully: without an API key the recipe
/// client runs in mock mode and retrieval skips the embedding rerank.
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub embed_model: Option<String>,
    pub base_url: Option<String>,
    pub data_dir: PathBuf,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl KitchenConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_var("GRANDMAS_KITCHEN_API_KEY").or_else(|| env_var("OPENAI_API_KEY")),
            model: env_var("OPENAI_MODEL"),
            embed_model: env_var("OPENAI_EMBED_MODEL"),
            base_url: env_var("GRANDMAS_KITCHEN_BASE_URL"),
            data_dir: env_var("GRANDMAS_KITCHEN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    pub fn recipe_client(&self) -> RecipeClient {
        let mut client = RecipeClient::new(self.api_key.clone());
        if let Some(model) = &self.model {
            client = client.with_model(model);
        }
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url);
        }
        client
    }

    /// Embedding client for retrieval reranking, only when a key is set.
    /// Vectors cache under the data directory.
    pub fn embedder(&self) -> Option<EmbeddingClient> {
        let api_key = self.api_key.as_deref()?;
        let mut client = EmbeddingClient::new(api_key)
            .with_file_cache(EmbeddingCache::new(self.data_dir.join("embeddings")));
        if let Some(model) = &self.embed_model {
            client = client.with_model(model);
        }
        if let Some(base_url) = &self.base_url {
            client = client.with_base_url(base_url);
        }
        Some(client)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mock_client_without_key() {
        let config = KitchenConfig {
            api_key: None,
            model: Some("gpt-4.1-mini".to_string()),
            embed_model: None,
            base_url: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        };
        assert_eq!(config.recipe_client().model_name(), "mock-fallback");
        assert!(config.embedder().is_none());
    }

    #[test]
    fn profile_lives_under_data_dir() {
        let config = KitchenConfig {
            api_key: None,
            model: None,
            embed_model: None,
            base_url: None,
            data_dir: PathBuf::from("/tmp/kitchen"),
        };
        assert_eq!(config.profile_path(), PathBuf::from("/tmp/kitchen/profile.json"));
    }
}
