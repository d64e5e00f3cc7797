use crate::catalog::{StyleCatalog, StyleEntry};
use crate::error::{Result, StyleError};
use crate::signals::{
    detect_cuisine_signal, detect_regional_override, normalize_text, tokenize,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Free-text inference request. `thread_id` only matters for whether this is
/// the first turn of a conversation; `preference_weights` come from the
/// personalization store, keyed by style id.
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest<'a> {
    pub message: &'a str,
    pub thread_id: Option<&'a str>,
    pub current_style_id: Option<&'a str>,
    pub preference_weights: HashMap<String, f32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedStyle {
    pub id: String,
    pub label: String,
    pub cuisine: String,
    pub region: Option<String>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleInference {
    pub primary: RankedStyle,
    pub alternatives: Vec<RankedStyle>,
    pub reasoning_tags: Vec<String>,
}

struct Candidate<'a> {
    entry: &'a StyleEntry,
    score: f32,
    alias_match_strength: u32,
    cuisine_matched: bool,
    tags: Vec<String>,
}

impl Candidate<'_> {
    fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }
}

fn bounded_confidence(raw: f32) -> f32 {
    if !raw.is_finite() {
        return 0.35;
    }
    raw.clamp(0.35, 0.98)
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn matches_phrase(text: &str, phrase: &str) -> bool {
    let normalized = normalize_text(phrase);
    !normalized.is_empty() && text.contains(&normalized)
}

/// Score every catalog entry against the message and rank with the
/// alias-first tie-break. Confidence spreads the top cuisine bucket's mass
/// between the leader and its alternatives, clamped to [0.35, 0.98].
pub fn infer_style(catalog: &StyleCatalog, request: &InferenceRequest) -> Result<StyleInference> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(StyleError::EmptyMessage);
    }
    if catalog.is_empty() {
        return Err(StyleError::EmptyCatalog);
    }

    let text = normalize_text(message);
    let tokens = tokenize(&text);
    let regional = detect_regional_override(&text);
    let signal = detect_cuisine_signal(&text);

    let mut candidates: Vec<Candidate> = catalog
        .styles()
        .iter()
        .map(|entry| {
            let mut candidate = Candidate {
                entry,
                score: 0.0,
                alias_match_strength: 0,
                cuisine_matched: false,
                tags: Vec::new(),
            };
            score_entry(&mut candidate, &text, &tokens, request, regional.as_ref(), &signal);
            candidate
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.alias_match_strength
            .cmp(&a.alias_match_strength)
            .then_with(|| b.cuisine_matched.cmp(&a.cuisine_matched))
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });

    let top_cuisine = candidates[0].entry.cuisine.clone();
    let total_top: f32 = candidates
        .iter()
        .filter(|c| c.entry.cuisine == top_cuisine)
        .take(5)
        .map(|c| c.score.max(0.0))
        .sum();

    let primary_confidence = if total_top > 0.0 {
        bounded_confidence(0.45 + candidates[0].score.max(0.0) / total_top * 0.5)
    } else {
        0.4
    };

    let first_turn = request.thread_id.is_none();
    let primary_id = candidates[0].entry.id.clone();

    let alternatives: Vec<RankedStyle> = candidates
        .iter()
        .filter(|c| !first_turn || c.entry.cuisine == top_cuisine)
        .filter(|c| c.entry.id != primary_id)
        .take(3)
        .map(|c| {
            let confidence = if total_top > 0.0 {
                bounded_confidence(0.22 + c.score.max(0.0) / total_top * 0.35)
            } else {
                0.25
            };
            ranked(c.entry, round2(confidence))
        })
        .collect();

    let mut reasoning_tags: Vec<String> = signal.tags.clone();
    for tag in candidates[0].tags.iter() {
        if !reasoning_tags.iter().any(|t| t == tag) {
            reasoning_tags.push(tag.clone());
        }
    }
    reasoning_tags.truncate(8);

    log::debug!(
        "inferred style {} ({:.2}) from {} candidates",
        primary_id,
        primary_confidence,
        catalog.len()
    );

    Ok(StyleInference {
        primary: ranked(candidates[0].entry, round2(primary_confidence)),
        alternatives,
        reasoning_tags,
    })
}

fn ranked(entry: &StyleEntry, confidence: f32) -> RankedStyle {
    RankedStyle {
        id: entry.id.clone(),
        label: entry.label.clone(),
        cuisine: entry.cuisine.clone(),
        region: entry.region.clone(),
        confidence,
    }
}

fn score_entry(
    candidate: &mut Candidate,
    text: &str,
    tokens: &[String],
    request: &InferenceRequest,
    regional: Option<&crate::signals::RegionalOverride>,
    signal: &crate::signals::CuisineSignalHit,
) {
    let entry = candidate.entry;
    let cuisine_text = normalize_text(&entry.cuisine);
    let region_text = normalize_text(entry.region.as_deref().unwrap_or(""));
    let label_text = normalize_text(&entry.label);
    let aliases: Vec<String> = entry.aliases.iter().map(|a| normalize_text(a)).collect();

    for alias in &aliases {
        if matches_phrase(text, alias) {
            let multi_word = alias.split(' ').count() >= 2;
            candidate.alias_match_strength += if multi_word { 2 } else { 1 };
            candidate.score += if multi_word { 8.0 } else { 5.0 };
            candidate.add_tag(alias);
        }
    }

    if !cuisine_text.is_empty() && matches_phrase(text, &cuisine_text) {
        candidate.score += 4.0;
        candidate.cuisine_matched = true;
        candidate.add_tag(&cuisine_text);
    }

    if !region_text.is_empty() && matches_phrase(text, &region_text) {
        candidate.score += 5.0;
        candidate.add_tag(&region_text);
    }

    for token in tokens {
        if label_text.contains(token.as_str()) {
            candidate.score += 1.25;
            candidate.add_tag(token);
        }
        if region_text.contains(token.as_str()) {
            candidate.score += 1.5;
            candidate.add_tag(token);
        }
        if cuisine_text.contains(token.as_str()) {
            candidate.score += 1.25;
            candidate.cuisine_matched = true;
            candidate.add_tag(token);
        }
    }

    if let Some(regional) = regional {
        if entry.cuisine == regional.cuisine {
            candidate.score += 6.0;
            let hint_hit = regional
                .region_hints
                .iter()
                .any(|hint| region_text.contains(hint))
                || aliases
                    .iter()
                    .any(|alias| regional.region_hints.iter().any(|hint| alias.contains(hint)));
            if hint_hit {
                candidate.score += 18.0;
                candidate.alias_match_strength += 3;
                candidate.add_tag(regional.tag);
                candidate.add_tag("regional-override");
            }
        } else {
            candidate.score -= 8.0;
        }
    }

    if let Some(signal_cuisine) = signal.cuisine.as_deref() {
        let strong = signal.score_lead >= 3.0;
        if entry.cuisine == signal_cuisine {
            candidate.score += if strong { 12.0 } else { 7.0 };
            candidate.add_tag("cuisine-signal");
        } else {
            candidate.score -= if strong { 10.0 } else { 4.0 };
        }
    }

    if request.current_style_id == Some(entry.id.as_str()) {
        candidate.score += 0.5;
        candidate.add_tag("current-style-context");
    }

    if let Some(weight) = request.preference_weights.get(&entry.id) {
        if weight.is_finite() {
            let bounded = weight.clamp(-4.0, 12.0);
            candidate.score += bounded * 0.4;
            if bounded > 0.0 {
                candidate.add_tag("profile-history");
            }
        }
    }
}
