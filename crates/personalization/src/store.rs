use crate::error::{PersonalizationError, Result};
use crate::signals::{normalize_cuisine, RegionalSignal};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const STORE_SCHEMA_VERSION: u32 = 1;
const SIGNAL_WINDOW_DAYS: i64 = 180;

/// One recorded preference signal, kept with enough context to weigh it
/// later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub cuisine: String,
    pub key: String,
    pub label: String,
    pub confidence: f32,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Rolling summary of the most recent generation activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasteProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_regional_style: Option<String>,
    #[serde(default)]
    pub total_generations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    schema_version: u32,
    #[serde(default)]
    signals: Vec<SignalEvent>,
    #[serde(default)]
    style_weights: HashMap<String, f32>,
    #[serde(default)]
    taste: TasteProfile,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION,
            signals: Vec::new(),
            style_weights: HashMap::new(),
            taste: TasteProfile::default(),
        }
    }
}

/// File-backed preference store. A missing file is an empty store; writes
/// go through a temp file and rename so a crash never leaves a torn file.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    data: StoreFile,
}

impl PreferenceStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data: StoreFile = serde_json::from_slice(&bytes)?;
                if data.schema_version != STORE_SCHEMA_VERSION {
                    return Err(PersonalizationError::UnsupportedSchema(data.schema_version));
                }
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&self.data)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!(
            "saved taste profile ({} signal events) to {}",
            self.data.signals.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn record_signals(
        &mut self,
        cuisine: &str,
        source: &str,
        thread_id: Option<&str>,
        signals: &[RegionalSignal],
        now: DateTime<Utc>,
    ) {
        let cuisine = normalize_cuisine(cuisine);
        for signal in signals {
            self.data.signals.push(SignalEvent {
                cuisine: cuisine.clone(),
                key: signal.key.clone(),
                label: signal.label.clone(),
                confidence: signal.confidence,
                source: source.to_string(),
                thread_id: thread_id.map(str::to_string),
                recorded_at: now,
            });
        }
    }

    /// Bump the weight a style carries into inference. Weights accumulate
    /// across sessions; inference clamps them on its side.
    pub fn record_style_choice(&mut self, style_id: &str, weight: f32) {
        *self
            .data
            .style_weights
            .entry(style_id.to_string())
            .or_insert(0.0) += weight;
    }

    pub fn style_weights(&self) -> HashMap<String, f32> {
        self.data.style_weights.clone()
    }

    pub fn record_generation(
        &mut self,
        persona: Option<&str>,
        cuisine: Option<&str>,
        regional_style: Option<&str>,
    ) {
        let taste = &mut self.data.taste;
        if let Some(persona) = persona {
            taste.last_persona = Some(persona.to_string());
        }
        if let Some(cuisine) = cuisine {
            taste.last_cuisine = Some(cuisine.to_string());
        }
        if let Some(style) = regional_style {
            taste.last_regional_style = Some(style.to_string());
        }
        taste.total_generations += 1;
    }

    pub fn taste_profile(&self) -> &TasteProfile {
        &self.data.taste
    }

    /// Strongest regional signal for a cuisine: confidences summed per
    /// label over the trailing window, ties broken by the most recent
    /// event.
    pub fn dominant_signal(&self, cuisine: &str, now: DateTime<Utc>) -> Option<String> {
        let cuisine = normalize_cuisine(cuisine);
        let cutoff = now - Duration::days(SIGNAL_WINDOW_DAYS);

        let mut totals: HashMap<&str, (f32, DateTime<Utc>)> = HashMap::new();
        for event in &self.data.signals {
            if event.cuisine != cuisine || event.recorded_at <= cutoff {
                continue;
            }
            let entry = totals
                .entry(event.label.as_str())
                .or_insert((0.0, event.recorded_at));
            entry.0 += event.confidence;
            if event.recorded_at > entry.1 {
                entry.1 = event.recorded_at;
            }
        }

        totals
            .into_iter()
            .max_by(|a, b| {
                a.1 .0
                    .partial_cmp(&b.1 .0)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.1 .1.cmp(&b.1 .1))
            })
            .map(|(label, _)| label.to_string())
    }
}

/// What generation feeds into the prompt on behalf of the user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonalizationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_style: Option<String>,
    pub preference_notes: Vec<String>,
}

/// Resolve the personalization context for one request. A regional signal
/// in the current prompt wins; otherwise the stored dominant signal for
/// the cuisine applies.
pub fn personalization_context(
    store: &PreferenceStore,
    cuisine: &str,
    prompt: Option<&str>,
    now: DateTime<Utc>,
) -> PersonalizationContext {
    let prompt_signals = prompt
        .map(|p| crate::signals::extract_regional_signals(p, cuisine))
        .unwrap_or_default();
    let dominant = store.dominant_signal(cuisine, now);

    let regional_style = prompt_signals
        .first()
        .map(|s| s.label.clone())
        .or_else(|| dominant.clone());

    let mut preference_notes = Vec::new();
    if !prompt_signals.is_empty() {
        let labels: Vec<&str> = prompt_signals.iter().map(|s| s.label.as_str()).collect();
        preference_notes.push(format!("Current prompt suggests: {}.", labels.join(", ")));
    }
    if let Some(dominant) = dominant {
        preference_notes.push(format!("Returning preference trend: {dominant}."));
    }

    PersonalizationContext {
        regional_style,
        preference_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::extract_regional_signals;
    use pretty_assertions::assert_eq;

    fn sample_signals() -> Vec<RegionalSignal> {
        extract_regional_signals("my nonna was from Sicily", "Italian")
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::open(dir.path().join("profile.json")).unwrap();
        assert!(store.style_weights().is_empty());
        assert_eq!(store.taste_profile().total_generations, 0);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let now = Utc::now();

        let mut store = PreferenceStore::open(&path).unwrap();
        store.record_signals("Italian", "prompt", Some("t-1"), &sample_signals(), now);
        store.record_style_choice("it-sicilian", 2.0);
        store.record_generation(Some("Nonna Rosa"), Some("Italian"), Some("Sicilian"));
        store.save().unwrap();

        let reloaded = PreferenceStore::open(&path).unwrap();
        assert_eq!(reloaded.style_weights().get("it-sicilian"), Some(&2.0));
        assert_eq!(reloaded.taste_profile().total_generations, 1);
        assert_eq!(
            reloaded.dominant_signal("Italian", now),
            Some("Sicilian".to_string())
        );
    }

    #[test]
    fn dominant_signal_sums_confidence_within_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join("p.json")).unwrap();
        let now = Utc::now();

        // Two weaker Neapolitan events outweigh one strong Sicilian one.
        let sicilian = extract_regional_signals("sicilian", "Italian");
        let neapolitan = extract_regional_signals("neapolitan", "Italian");
        store.record_signals("Italian", "prompt", None, &sicilian, now);
        store.record_signals("Italian", "prompt", None, &neapolitan, now);
        store.record_signals("Italian", "prompt", None, &neapolitan, now);

        assert_eq!(
            store.dominant_signal("Italian", now),
            Some("Neapolitan".to_string())
        );
    }

    #[test]
    fn old_signals_fall_out_of_the_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join("p.json")).unwrap();
        let now = Utc::now();
        let long_ago = now - Duration::days(200);

        store.record_signals("Italian", "prompt", None, &sample_signals(), long_ago);
        assert_eq!(store.dominant_signal("Italian", now), None);
    }

    #[test]
    fn signals_are_scoped_to_their_cuisine() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join("p.json")).unwrap();
        let now = Utc::now();

        store.record_signals("Italian", "prompt", None, &sample_signals(), now);
        assert_eq!(store.dominant_signal("Mexican", now), None);
        assert!(store.dominant_signal("italian food", now).is_some());
    }

    #[test]
    fn prompt_signal_beats_stored_trend() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join("p.json")).unwrap();
        let now = Utc::now();
        store.record_signals("Italian", "prompt", None, &sample_signals(), now);

        let context =
            personalization_context(&store, "Italian", Some("something neapolitan tonight"), now);
        assert_eq!(context.regional_style.as_deref(), Some("Neapolitan"));
        assert_eq!(
            context.preference_notes,
            vec![
                "Current prompt suggests: Neapolitan.".to_string(),
                "Returning preference trend: Sicilian.".to_string(),
            ]
        );
    }

    #[test]
    fn trend_applies_when_prompt_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = PreferenceStore::open(dir.path().join("p.json")).unwrap();
        let now = Utc::now();
        store.record_signals("Italian", "prompt", None, &sample_signals(), now);

        let context = personalization_context(&store, "Italian", Some("cozy pasta dinner"), now);
        assert_eq!(context.regional_style.as_deref(), Some("Sicilian"));
        assert_eq!(
            context.preference_notes,
            vec!["Returning preference trend: Sicilian.".to_string()]
        );
    }
}
