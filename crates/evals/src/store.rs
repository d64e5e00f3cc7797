use crate::error::{EvalError, Result};
use crate::harness::RunSummary;
use std::path::{Path, PathBuf};

/// File-backed run history: one JSON document per run under `runs/`.
#[derive(Debug, Clone)]
pub struct RunStore {
    runs_dir: PathBuf,
}

impl RunStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            runs_dir: data_dir.as_ref().join("runs"),
        }
    }

    /// Persist a run summary. Writes go through a temp file and rename so a
    /// crash never leaves a torn run document.
    pub fn save(&self, summary: &RunSummary) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.runs_dir).map_err(EvalError::StoreIo)?;
        let path = self.runs_dir.join(format!("{}.json", summary.run.id));
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(summary).map_err(EvalError::StoreParse)?;
        std::fs::write(&tmp, body).map_err(EvalError::StoreIo)?;
        std::fs::rename(&tmp, &path).map_err(EvalError::StoreIo)?;
        log::debug!("saved eval run {} to {}", summary.run.id, path.display());
        Ok(path)
    }

    /// Most recent stored run by start time.
    pub fn latest(&self) -> Result<RunSummary> {
        let entries = match std::fs::read_dir(&self.runs_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(EvalError::NoRuns),
            Err(e) => return Err(EvalError::StoreIo(e)),
        };

        let mut latest: Option<RunSummary> = None;
        for entry in entries {
            let entry = entry.map_err(EvalError::StoreIo)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(EvalError::StoreIo)?;
            let summary: RunSummary = match serde_json::from_slice(&bytes) {
                Ok(summary) => summary,
                Err(e) => {
                    log::warn!("skipping unreadable run file {}: {e}", path.display());
                    continue;
                }
            };
            let newer = latest
                .as_ref()
                .map(|current| summary.run.started_at > current.run.started_at)
                .unwrap_or(true);
            if newer {
                latest = Some(summary);
            }
        }

        latest.ok_or(EvalError::NoRuns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::baseline_cases;
    use crate::harness::run_harness;
    use kitchen_generate::RecipeClient;
    use pretty_assertions::assert_eq;

    async fn sample_summary() -> RunSummary {
        let cases: Vec<_> = baseline_cases().into_iter().take(2).collect();
        run_harness(&RecipeClient::new(None), &cases).await.unwrap()
    }

    #[tokio::test]
    async fn save_then_latest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());
        let summary = sample_summary().await;
        store.save(&summary).unwrap();

        let loaded = store.latest().unwrap();
        assert_eq!(loaded.run.id, summary.run.id);
        assert_eq!(loaded.results.len(), summary.results.len());
    }

    #[tokio::test]
    async fn latest_picks_the_newest_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());

        let first = sample_summary().await;
        let second = sample_summary().await;
        assert!(second.run.started_at >= first.run.started_at);
        store.save(&second).unwrap();
        store.save(&first).unwrap();

        let loaded = store.latest().unwrap();
        assert_eq!(loaded.run.id, second.run.id);
    }

    #[test]
    fn empty_store_reports_no_runs() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());
        assert!(matches!(store.latest(), Err(EvalError::NoRuns)));
    }
}
