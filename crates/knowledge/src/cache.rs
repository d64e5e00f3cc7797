use crate::error::Result;
use std::path::{Path, PathBuf};

const CACHE_MAGIC: &[u8; 4] = b"EK01";

/// Persistent vector cache. One file per embedded text, sharded by the
/// leading bytes of the cache key, written atomically via tmp-then-rename.
#[derive(Clone, Debug)]
pub struct EmbeddingCache {
    base_dir: PathBuf,
}

impl EmbeddingCache {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().join("cache").join("embeddings"),
        }
    }

    pub fn vector_path(&self, model_id: &str, key: &str) -> PathBuf {
        let (shard_a, shard_b) = shard_dirs(key);
        self.base_dir
            .join(safe_component(model_id))
            .join(shard_a)
            .join(shard_b)
            .join(format!("{key}.bin"))
    }

    pub async fn get_vector(&self, model_id: &str, key: &str) -> Option<Vec<f32>> {
        let path = self.vector_path(model_id, key);
        let bytes = tokio::fs::read(&path).await.ok()?;
        decode_vector(&bytes)
    }

    pub async fn put_vector(&self, model_id: &str, key: &str, vector: &[f32]) -> Result<()> {
        let path = self.vector_path(model_id, key);
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = encode_vector(vector);
        let tmp = path.with_extension("bin.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        if tokio::fs::rename(&tmp, &path).await.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        Ok(())
    }
}

fn safe_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.') {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}

fn shard_dirs(key: &str) -> (String, String) {
    let a = key.get(0..2).unwrap_or("00").to_string();
    let b = key.get(2..4).unwrap_or("00").to_string();
    (a, b)
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + vector.len() * 4);
    out.extend_from_slice(CACHE_MAGIC);
    #[allow(clippy::cast_possible_truncation)]
    let dim = vector.len() as u32;
    out.extend_from_slice(&dim.to_le_bytes());
    for v in vector {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn decode_vector(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() < 8 || &bytes[0..4] != CACHE_MAGIC {
        return None;
    }
    let dim = u32::from_le_bytes(bytes[4..8].try_into().ok()?) as usize;
    let expected_len = 8usize.saturating_add(dim.saturating_mul(4));
    if bytes.len() != expected_len {
        return None;
    }
    let mut vector = Vec::with_capacity(dim);
    for i in 0..dim {
        let start = 8 + i * 4;
        let val = f32::from_le_bytes(bytes[start..start + 4].try_into().ok()?);
        vector.push(val);
    }
    Some(vector)
}
